//! Record store contract
//!
//! The durable side of the inventory. Implementations own the schema and the
//! uniqueness of product ids; the inventory cache only talks to them through
//! this trait.

use crate::domain::{NewProduct, Product, ProductChanges, ProductId, Result};

pub trait RecordStore {
    /// Creates the backing table if it does not exist. Safe to call repeatedly.
    fn init_schema(&mut self) -> Result<()>;

    /// Persists a new row and returns its id.
    ///
    /// When `product.id` is `None` the store assigns one. A supplied id that
    /// already exists fails with `DuplicateId`.
    fn insert(&mut self, product: &NewProduct) -> Result<ProductId>;

    /// Applies the present fields of `changes` to row `id`.
    fn update(&mut self, id: ProductId, changes: &ProductChanges) -> Result<()>;

    /// Removes row `id`. Deleting a missing row fails with `NotFound`.
    fn delete(&mut self, id: ProductId) -> Result<()>;

    /// Returns every row ordered by id ascending.
    fn load_all(&self) -> Result<Vec<Product>>;
}
