//! Write-through inventory cache
//!
//! Every read is served from an in-memory map keyed by product id. Every
//! mutation is validated first, then applied to the cache and the record
//! store in a fixed order:
//!
//! | Operation | Order | On store failure |
//! |-----------|-------|------------------|
//! | add | store insert, then cache insert | cache untouched |
//! | update | cache mutation, then store update | cache keeps the new value |
//! | remove | store delete, then cache removal | cache untouched |
//!
//! A failed update therefore leaves the cache ahead of the store. The error
//! is returned to the caller and logged; [`Inventory::reconcile`] brings the
//! cache back in line with the store.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::domain::{
    InventoryError, NewProduct, Product, ProductChanges, ProductId, Result, ValidationError,
};
use crate::storage::{RecordStore, SqliteStore};

/// In-memory product map kept in sync with a [`RecordStore`]
pub struct Inventory<S: RecordStore = SqliteStore> {
    store: S,
    items: BTreeMap<ProductId, Product>,
}

impl<S: RecordStore> Inventory<S> {
    /// Prepares the schema and loads every row from `store`
    ///
    /// No other operation is possible until this has succeeded.
    pub fn open(mut store: S) -> Result<Self> {
        store.init_schema()?;

        let mut inventory = Self {
            store,
            items: BTreeMap::new(),
        };
        inventory.load_from_store()?;

        Ok(inventory)
    }

    fn load_from_store(&mut self) -> Result<()> {
        self.items = self
            .store
            .load_all()?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        info!(count = self.items.len(), "inventory cache loaded");
        Ok(())
    }

    /// Returns the underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All products, ordered by id
    pub fn list_all(&self) -> Vec<Product> {
        self.items.values().cloned().collect()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.get(&id)
    }

    /// Next id to hand out: one past the highest id present, or 1 when empty
    ///
    /// Recomputed on every call, so the id of a deleted highest product is
    /// handed out again. Fails once `ProductId::MAX` is taken.
    fn next_id(&self) -> Result<ProductId> {
        match self.items.keys().next_back() {
            None => Ok(1),
            Some(&max) => max
                .checked_add(1)
                .ok_or_else(|| ValidationError::IdsExhausted(max).into()),
        }
    }

    /// Adds a product, assigning an id when none is supplied
    pub fn add(&mut self, product: NewProduct) -> Result<Product> {
        product.validate()?;

        let id = match product.id {
            Some(id) if self.items.contains_key(&id) => {
                return Err(InventoryError::DuplicateId(id));
            }
            Some(id) => id,
            None => self.next_id()?,
        };

        let product = NewProduct {
            id: Some(id),
            ..product
        };
        let id = self.store.insert(&product)?;

        let product = product.into_product(id);
        self.items.insert(id, product.clone());
        debug!(id, name = %product.name, "product added");

        Ok(product)
    }

    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<Product> {
        self.update_fields(id, ProductChanges::quantity(quantity))
    }

    pub fn update_price(&mut self, id: ProductId, price: f64) -> Result<Product> {
        self.update_fields(id, ProductChanges::price(price))
    }

    /// Applies the present fields of `changes` to product `id`
    ///
    /// The cache is mutated before the store write and is not rolled back if
    /// that write fails.
    pub fn update_fields(&mut self, id: ProductId, changes: ProductChanges) -> Result<Product> {
        changes.validate()?;

        let product = self
            .items
            .get_mut(&id)
            .ok_or(InventoryError::NotFound(id))?;
        changes.apply_to(product);
        let updated = product.clone();

        if let Err(err) = self.store.update(id, &changes) {
            warn!(id, error = %err, "store update failed; cache and store have diverged");
            return Err(err);
        }

        debug!(id, "product updated");
        Ok(updated)
    }

    /// Removes product `id` from the store, then from the cache
    pub fn remove(&mut self, id: ProductId) -> Result<Product> {
        if !self.items.contains_key(&id) {
            return Err(InventoryError::NotFound(id));
        }

        self.store.delete(id)?;

        let removed = self
            .items
            .remove(&id)
            .ok_or(InventoryError::NotFound(id))?;
        debug!(id, "product removed");

        Ok(removed)
    }

    /// Case-insensitive substring search on product names
    ///
    /// Results are ordered by name, then by id. An empty needle matches
    /// everything.
    pub fn find_by_name(&self, text: &str) -> Vec<Product> {
        let needle = text.to_lowercase();

        let mut matches: Vec<Product> = self
            .items
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        matches
    }

    /// Products with a quantity at or below `threshold`, ordered by id
    pub fn low_stock(&self, threshold: i64) -> Vec<Product> {
        self.items
            .values()
            .filter(|p| p.quantity <= threshold)
            .cloned()
            .collect()
    }

    /// Sum of quantity times price over every product
    pub fn total_value(&self) -> f64 {
        self.items.values().map(Product::value).sum()
    }

    /// Total units on hand
    ///
    /// Widened to `i128` so any number of `i64` quantities sums exactly.
    pub fn total_units(&self) -> i128 {
        self.items.values().map(|p| i128::from(p.quantity)).sum()
    }

    /// Reloads the cache from the store, which wins on any difference
    ///
    /// Returns the ids that were added, removed or changed, in ascending order.
    pub fn reconcile(&mut self) -> Result<Vec<ProductId>> {
        let stored: BTreeMap<ProductId, Product> = self
            .store
            .load_all()?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let mut diverged: Vec<ProductId> = stored
            .iter()
            .filter(|&(id, product)| self.items.get(id) != Some(product))
            .map(|(id, _)| *id)
            .chain(self.items.keys().filter(|id| !stored.contains_key(*id)).copied())
            .collect();
        diverged.sort_unstable();

        if !diverged.is_empty() {
            warn!(ids = ?diverged, "cache diverged from store; adopting store contents");
        }
        self.items = stored;

        Ok(diverged)
    }
}
