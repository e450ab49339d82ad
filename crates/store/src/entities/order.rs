use chrono::{DateTime, Utc};
use common::{ClientId, OrderId, OrderLineId, ProductId};
use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// ```text
/// Pending ──► InProcess ──► Completed
///    │            │
///    └────────────┴──► Cancelled
/// ```
///
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Newly created, stock not yet touched.
    #[default]
    Pending,

    /// Being worked on.
    InProcess,

    /// Fulfilled; product stock has been decremented (terminal).
    Completed,

    /// Abandoned; stock never decremented (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the lifecycle allows moving from `self` to `target`.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Pending, OrderStatus::InProcess)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::InProcess, OrderStatus::Completed)
                | (OrderStatus::InProcess, OrderStatus::Cancelled)
        )
    }

    /// Returns true if no further transition is permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns true for statuses still in flight (Pending, InProcess).
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the status name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProcess => "IN_PROCESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "IN_PROCESS" => Ok(OrderStatus::InProcess),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// One (product, quantity) pairing within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product_id: ProductId,
    /// Always >= 1; validated at order creation.
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: OrderLineId::new(),
            product_id,
            quantity,
        }
    }
}

/// A client order: an owned list of lines plus lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: ClientId,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    /// Set once at creation, immutable thereafter.
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(client_id: ClientId, lines: Vec<OrderLine>, status: OrderStatus) -> Self {
        Self {
            id: OrderId::new(),
            client_id,
            lines,
            status,
            created_at: Utc::now(),
        }
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn pending_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProcess));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn in_process_transitions() {
        assert!(OrderStatus::InProcess.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::InProcess.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::InProcess.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::InProcess.can_transition_to(OrderStatus::InProcess));
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for target in [
                OrderStatus::Pending,
                OrderStatus::InProcess,
                OrderStatus::Completed,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
            assert!(terminal.is_terminal());
            assert!(!terminal.is_open());
        }
    }

    #[test]
    fn open_states() {
        assert!(OrderStatus::Pending.is_open());
        assert!(OrderStatus::InProcess.is_open());
    }

    #[test]
    fn wire_names_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::InProcess,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert!("DRAFT".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_sums_line_quantities() {
        let order = Order::new(
            ClientId::new(),
            vec![
                OrderLine::new(ProductId::new(), 3),
                OrderLine::new(ProductId::new(), 2),
            ],
            OrderStatus::Pending,
        );
        assert_eq!(order.total_quantity(), 5);
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
