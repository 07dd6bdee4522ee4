//! Stockroom - a local inventory manager
//!
//! Products live in a SQLite table and are mirrored by an in-memory cache
//! that serves every read. Mutations are validated up front and written
//! through to the database.

pub mod domain;
pub mod storage;
pub mod inventory;
pub mod cli;

pub use domain::{InventoryError, NewProduct, Product, ProductChanges, ProductId, ValidationError};
pub use inventory::{Inventory, SharedInventory};
pub use storage::{RecordStore, SqliteStore};
