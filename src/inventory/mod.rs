//! Inventory cache
//!
//! [`Inventory`] serves all reads from memory and writes every mutation
//! through to a [`RecordStore`](crate::storage::RecordStore).
//! [`SharedInventory`] wraps one instance for callers on several threads.

mod cache;
mod shared;

pub use cache::Inventory;
pub use shared::SharedInventory;
