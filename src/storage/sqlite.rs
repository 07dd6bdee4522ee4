//! SQLite record store
//!
//! Products live in a single `products` table. Without `AUTOINCREMENT`,
//! SQLite hands out `max(rowid) + 1` for rows inserted without an id.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{ffi, params, Connection, ErrorCode};
use tracing::debug;

use super::RecordStore;
use crate::domain::{
    InventoryError, NewProduct, Product, ProductChanges, ProductId, Result, ValidationError,
};

/// Record store backed by a SQLite database
pub struct SqliteStore {
    /// Database file, `None` for in-memory stores
    path: Option<PathBuf>,

    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                InventoryError::StoreUnavailable(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(&path).map_err(|e| {
            InventoryError::StoreUnavailable(format!(
                "failed to open database {}: {}",
                path.display(),
                e
            ))
        })?;

        // WAL keeps readers from blocking the single writer
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| classify(e, None))?;

        debug!(path = %path.display(), "opened record store");

        Ok(Self {
            path: Some(path),
            conn,
        })
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| classify(e, None))?;
        Ok(Self { path: None, conn })
    }

    /// Returns the database file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl RecordStore for SqliteStore {
    fn init_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS products (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
                    quantity INTEGER NOT NULL CHECK (quantity >= 0),
                    price REAL NOT NULL CHECK (price >= 0)
                );
                ",
            )
            .map_err(|e| classify(e, None))?;

        debug!("products schema ready");
        Ok(())
    }

    fn insert(&mut self, product: &NewProduct) -> Result<ProductId> {
        product.validate()?;

        let result = match product.id {
            Some(id) => self.conn.execute(
                "INSERT INTO products (id, name, quantity, price) VALUES (?1, ?2, ?3, ?4)",
                params![id, product.name, product.quantity, product.price],
            ),
            None => self.conn.execute(
                "INSERT INTO products (name, quantity, price) VALUES (?1, ?2, ?3)",
                params![product.name, product.quantity, product.price],
            ),
        };
        result.map_err(|e| classify(e, product.id))?;

        let id = product
            .id
            .unwrap_or_else(|| self.conn.last_insert_rowid());
        debug!(id, name = %product.name, "inserted product row");

        Ok(id)
    }

    fn update(&mut self, id: ProductId, changes: &ProductChanges) -> Result<()> {
        changes.validate()?;

        let affected = self
            .conn
            .execute(
                "UPDATE products SET
                    name = COALESCE(?1, name),
                    quantity = COALESCE(?2, quantity),
                    price = COALESCE(?3, price)
                 WHERE id = ?4",
                params![changes.name, changes.quantity, changes.price, id],
            )
            .map_err(|e| classify(e, None))?;

        if affected == 0 {
            return Err(InventoryError::NotFound(id));
        }

        debug!(id, "updated product row");
        Ok(())
    }

    fn delete(&mut self, id: ProductId) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(|e| classify(e, None))?;

        if affected == 0 {
            return Err(InventoryError::NotFound(id));
        }

        debug!(id, "deleted product row");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, quantity, price FROM products ORDER BY id")
            .map_err(|e| classify(e, None))?;

        let products = stmt
            .query_map([], |row| {
                Ok(Product {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    quantity: row.get(2)?,
                    price: row.get(3)?,
                })
            })
            .map_err(|e| classify(e, None))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| classify(e, None))?;

        debug!(count = products.len(), "loaded product rows");
        Ok(products)
    }
}

/// Maps a SQLite failure onto the inventory error kinds
///
/// `id` is the caller-supplied id of an insert, used to report key collisions.
fn classify(err: rusqlite::Error, id: Option<ProductId>) -> InventoryError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            return match (failure.extended_code, id) {
                (ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE, Some(id)) => {
                    InventoryError::DuplicateId(id)
                }
                _ => ValidationError::Constraint(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                )
                .into(),
            };
        }
    }

    InventoryError::StoreUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let mut store = memory_store();
        store.init_schema().unwrap();
        store.init_schema().unwrap();

        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_ids() {
        let mut store = memory_store();

        let first = store.insert(&NewProduct::new("Hammer", 3, 12.5)).unwrap();
        let second = store.insert(&NewProduct::new("Saw", 1, 20.0)).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_insert_with_supplied_id() {
        let mut store = memory_store();

        let id = store
            .insert(&NewProduct::new("Drill", 2, 80.0).with_id(42))
            .unwrap();
        assert_eq!(id, 42);

        let err = store
            .insert(&NewProduct::new("Other drill", 1, 60.0).with_id(42))
            .unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateId(42)));
    }

    #[test]
    fn test_insert_rejects_invalid_values() {
        let mut store = memory_store();

        let err = store.insert(&NewProduct::new("", 1, 1.0)).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(ValidationError::EmptyName)));

        let err = store.insert(&NewProduct::new("Glue", -2, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Validation(ValidationError::NegativeQuantity(-2))
        ));

        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_check_constraints_back_up_validation() {
        let store = memory_store();

        let err = store
            .conn
            .execute(
                "INSERT INTO products (name, quantity, price) VALUES ('Tape', -1, 1.0)",
                [],
            )
            .map_err(|e| classify(e, None))
            .unwrap_err();

        assert!(matches!(
            err,
            InventoryError::Validation(ValidationError::Constraint(_))
        ));
    }

    #[test]
    fn test_update_and_delete_missing_rows() {
        let mut store = memory_store();

        let err = store.update(9, &ProductChanges::quantity(1)).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(9)));

        let err = store.delete(9).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(9)));
    }

    #[test]
    fn test_update_applies_present_fields() {
        let mut store = memory_store();
        let id = store.insert(&NewProduct::new("Nails", 100, 0.05)).unwrap();

        store
            .update(id, &ProductChanges::price(0.07).with_name("Steel nails"))
            .unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(
            rows,
            vec![Product {
                id,
                name: "Steel nails".to_string(),
                quantity: 100,
                price: 0.07,
            }]
        );
    }

    #[test]
    fn test_update_rejects_negative_values_before_writing() {
        let mut store = memory_store();
        let id = store.insert(&NewProduct::new("Screws", 10, 0.1)).unwrap();

        let err = store.update(id, &ProductChanges::price(-1.0)).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
        assert_eq!(store.load_all().unwrap()[0].price, 0.1);
    }

    #[test]
    fn test_double_delete_fails() {
        let mut store = memory_store();
        let id = store.insert(&NewProduct::new("Clamp", 4, 9.0)).unwrap();

        store.delete(id).unwrap();
        let err = store.delete(id).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[test]
    fn test_load_all_orders_by_id() {
        let mut store = memory_store();
        store.insert(&NewProduct::new("C", 1, 1.0).with_id(30)).unwrap();
        store.insert(&NewProduct::new("A", 1, 1.0).with_id(10)).unwrap();
        store.insert(&NewProduct::new("B", 1, 1.0).with_id(20)).unwrap();

        let ids: Vec<_> = store.load_all().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("inventory.db");

        {
            let mut store = SqliteStore::open(&db_path).unwrap();
            store.init_schema().unwrap();
            store.insert(&NewProduct::new("Level", 2, 15.0)).unwrap();
            assert_eq!(store.path(), Some(db_path.as_path()));
        }

        let mut store = SqliteStore::open(&db_path).unwrap();
        store.init_schema().unwrap();
        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Level");
    }
}
