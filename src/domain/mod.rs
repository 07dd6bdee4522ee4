//! Domain models for Stockroom
//!
//! Contains the product model and its validation rules without any I/O concerns.

mod error;
mod product;

pub use error::{InventoryError, Result};
pub use product::{NewProduct, Product, ProductChanges, ProductId, ValidationError};
