use chrono::{DateTime, Utc};
use common::{Money, OrderId, SaleId};
use serde::{Deserialize, Serialize};

/// A sale recorded against a completed order.
///
/// At most one sale may exist per order; [`crate::SaleStore::insert_sale`]
/// enforces the unique index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub order_id: OrderId,
    pub price: Money,
    /// Set once at creation, server-side.
    pub created_at: DateTime<Utc>,
    /// Unset until delivery is explicitly registered.
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Sale {
    pub fn new(order_id: OrderId, price: Money, notes: Option<String>) -> Self {
        Self {
            id: SaleId::new(),
            order_id,
            price,
            created_at: Utc::now(),
            delivered_at: None,
            notes,
        }
    }
}
