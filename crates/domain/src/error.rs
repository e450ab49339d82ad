//! Domain error taxonomy.

use store::StoreError;
use store::entities::OrderStatus;
use thiserror::Error;

/// Errors raised by domain services.
///
/// The API layer translates each variant to a transport status code; the
/// [`DomainError::kind`] label travels in the response body so callers can
/// distinguish failure kinds programmatically.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An id or unique-key lookup missed.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A field value is malformed or out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// The operation is not permitted in the entity's current state.
    #[error("{0}")]
    InvalidState(String),

    /// The requested order status change is not in the transition table.
    /// The order is left unmodified.
    #[error("invalid order status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A requested quantity exceeds the available stock.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
    },

    /// A unique value is already taken.
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    /// Builds a `NotFound` for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable snake_case label for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::InvalidArgument(_) => "invalid_argument",
            DomainError::InvalidState(_) => "invalid_state",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::Conflict(_) => "conflict",
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => DomainError::NotFound {
                entity,
                id: id.to_string(),
            },
            StoreError::Duplicate {
                entity,
                field,
                value,
            } => DomainError::Conflict(format!("duplicate {entity} {field}: {value}")),
            StoreError::InsufficientStock {
                product,
                available,
                requested,
            } => DomainError::InsufficientStock {
                product,
                available,
                requested,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kinds_map_onto_domain_kinds() {
        let nf: DomainError = StoreError::NotFound {
            entity: "order",
            id: uuid::Uuid::nil(),
        }
        .into();
        assert_eq!(nf.kind(), "not_found");

        let dup: DomainError = StoreError::Duplicate {
            entity: "sale",
            field: "order_id",
            value: "x".into(),
        }
        .into();
        assert_eq!(dup.kind(), "conflict");

        let stock: DomainError = StoreError::InsufficientStock {
            product: "Chair".into(),
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(stock.kind(), "insufficient_stock");
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = DomainError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.kind(), "invalid_transition");
        assert!(err.to_string().contains("COMPLETED"));
        assert!(err.to_string().contains("PENDING"));
    }
}
