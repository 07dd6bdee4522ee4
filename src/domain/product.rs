//! Product domain model
//!
//! A product is one inventory line: a name, the units on hand and a unit
//! price. Validation lives here so every mutation path can reject bad values
//! before the cache or the store is touched.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a product row (SQLite `INTEGER PRIMARY KEY`)
pub type ProductId = i64;

/// Reasons a product value is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("product name cannot be empty")]
    EmptyName,

    #[error("quantity cannot be negative (got {0})")]
    NegativeQuantity(i64),

    #[error("price cannot be negative (got {0})")]
    NegativePrice(f64),

    #[error("price must be a finite number")]
    NonFinitePrice,

    #[error("product id must be positive (got {0})")]
    InvalidId(ProductId),

    #[error("no fields to update")]
    NoChanges,

    #[error("no id left above {0}; supply an explicit id")]
    IdsExhausted(ProductId),

    #[error("rejected by the record store: {0}")]
    Constraint(String),
}

/// A persisted inventory line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl Product {
    /// Stock value of this line (quantity times unit price)
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - Quantity: {} - Price: {:.2}",
            self.id, self.name, self.quantity, self.price
        )
    }
}

/// A product that has not been persisted yet
///
/// `id` is optional: when absent the inventory picks one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Requests a specific id instead of an assigned one
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.id {
            validate_id(id)?;
        }
        validate_name(&self.name)?;
        validate_quantity(self.quantity)?;
        validate_price(self.price)
    }

    /// Builds the persisted form once an id is known
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

/// Partial update of a product
///
/// Each field is applied only when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl ProductChanges {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoChanges);
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    /// Applies the present fields to `product` (no validation)
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}

fn validate_id(id: ProductId) -> Result<(), ValidationError> {
    if id < 1 {
        return Err(ValidationError::InvalidId(id));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity(quantity));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::NonFinitePrice);
    }
    if price < 0.0 {
        return Err(ValidationError::NegativePrice(price));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_validation() {
        assert!(NewProduct::new("Widget", 0, 0.0).validate().is_ok());
        assert_eq!(
            NewProduct::new("   ", 1, 1.0).validate(),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            NewProduct::new("Widget", -1, 1.0).validate(),
            Err(ValidationError::NegativeQuantity(-1))
        );
        assert_eq!(
            NewProduct::new("Widget", 1, -0.5).validate(),
            Err(ValidationError::NegativePrice(-0.5))
        );
        assert_eq!(
            NewProduct::new("Widget", 1, f64::NAN).validate(),
            Err(ValidationError::NonFinitePrice)
        );
        assert_eq!(
            NewProduct::new("Widget", 1, 1.0).with_id(0).validate(),
            Err(ValidationError::InvalidId(0))
        );
    }

    #[test]
    fn empty_changes_are_rejected() {
        assert_eq!(
            ProductChanges::default().validate(),
            Err(ValidationError::NoChanges)
        );
    }

    #[test]
    fn changes_apply_only_present_fields() {
        let mut product = NewProduct::new("Bolt", 10, 0.25).into_product(3);

        ProductChanges::price(0.30).apply_to(&mut product);
        assert_eq!(product.name, "Bolt");
        assert_eq!(product.quantity, 10);
        assert_eq!(product.price, 0.30);

        ProductChanges::default()
            .with_name("Hex bolt")
            .with_quantity(12)
            .apply_to(&mut product);
        assert_eq!(product.name, "Hex bolt");
        assert_eq!(product.quantity, 12);
        assert_eq!(product.price, 0.30);
    }

    #[test]
    fn display_format() {
        let product = NewProduct::new("Nut", 4, 1.5).into_product(7);
        assert_eq!(product.to_string(), "[7] Nut - Quantity: 4 - Price: 1.50");
        assert_eq!(product.value(), 6.0);
    }
}
