//! Shared inventory handle for concurrent callers
//!
//! The id computation in `add` and the validate-then-mutate sequence of the
//! updates are read-modify-write steps over the whole cache, so concurrent
//! callers go through one lock around the entire [`Inventory`].

use std::sync::{Arc, Mutex, PoisonError};

use super::Inventory;
use crate::storage::{RecordStore, SqliteStore};

/// Cloneable, thread-safe handle to a single [`Inventory`]
pub struct SharedInventory<S: RecordStore = SqliteStore> {
    inner: Arc<Mutex<Inventory<S>>>,
}

impl<S: RecordStore> SharedInventory<S> {
    pub fn new(inventory: Inventory<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inventory)),
        }
    }

    /// Runs `f` with exclusive access to the inventory
    ///
    /// A panic in a previous holder does not poison the handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut Inventory<S>) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<S: RecordStore> Clone for SharedInventory<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use super::*;
    use crate::domain::NewProduct;

    #[test]
    fn concurrent_adds_get_unique_ids() {
        let inventory = Inventory::open(SqliteStore::open_in_memory().unwrap()).unwrap();
        let shared = SharedInventory::new(inventory);

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            shared
                                .with(|inv| {
                                    inv.add(NewProduct::new(format!("w{}-{}", worker, i), i, 1.0))
                                })
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().copied().collect();

        assert_eq!(ids.len(), 200);
        assert_eq!(unique.len(), 200);
        assert_eq!(unique.iter().max(), Some(&200));

        shared.with(|inv| {
            assert_eq!(inv.len(), 200);
            assert_eq!(inv.store().load_all().unwrap(), inv.list_all());
        });
    }

    #[test]
    fn clones_share_state() {
        let inventory = Inventory::open(SqliteStore::open_in_memory().unwrap()).unwrap();
        let first = SharedInventory::new(inventory);
        let second = first.clone();

        first
            .with(|inv| inv.add(NewProduct::new("Shared", 1, 1.0)))
            .unwrap();

        assert_eq!(second.with(|inv| inv.len()), 1);
    }
}
