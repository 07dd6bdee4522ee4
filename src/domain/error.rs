//! Error kinds shared by the record store and the inventory cache

use thiserror::Error;

use super::product::{ProductId, ValidationError};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Invalid product: {0}")]
    Validation(#[from] ValidationError),

    #[error("Product id {0} already exists")]
    DuplicateId(ProductId),

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

impl InventoryError {
    /// Short machine-readable kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryError::Validation(_) => "validation",
            InventoryError::DuplicateId(_) => "duplicate_id",
            InventoryError::NotFound(_) => "not_found",
            InventoryError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

pub type Result<T, E = InventoryError> = std::result::Result<T, E>;
