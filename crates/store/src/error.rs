//! Store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the repository layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A unique index rejected the write.
    #[error("duplicate {entity} {field}: {value}")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A conditional stock decrement found fewer units than requested.
    /// The record is left unchanged.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
    },
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
