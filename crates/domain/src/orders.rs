//! Order lifecycle: creation, line replacement, status transitions and the
//! stock decrement coupled to completion.

use chrono::{DateTime, Utc};
use store::entities::{Order, OrderLine, OrderStatus};
use store::{CatalogStore, ClientStore, OrderStore, SaleStore};
use common::{ClientId, Money, OrderId, ProductId};

use crate::{DomainError, validate};

/// One requested order line. Quantity arrives signed from the wire.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Service driving the order state machine.
#[derive(Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore + ClientStore + CatalogStore + SaleStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates requested lines: at least one line, each product known,
    /// each quantity at least 1 and within the product's current stock.
    /// Stock is checked, not reserved; the decrement happens at completion.
    async fn build_lines(&self, lines: Vec<NewOrderLine>) -> Result<Vec<OrderLine>, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::InvalidArgument(
                "an order needs at least one line".into(),
            ));
        }
        let mut built = Vec::with_capacity(lines.len());
        for line in lines {
            let quantity = validate::quantity("quantity", line.quantity)?;
            if quantity == 0 {
                return Err(DomainError::InvalidArgument(
                    "line quantity must be at least 1".into(),
                ));
            }
            let product = self.store.get_product(line.product_id).await?;
            if product.stock < quantity {
                return Err(DomainError::InsufficientStock {
                    product: product.name,
                    available: product.stock,
                    requested: quantity,
                });
            }
            built.push(OrderLine::new(line.product_id, quantity));
        }
        Ok(built)
    }

    /// Creates an order for an existing client.
    ///
    /// The initial status defaults to Pending; a caller may start it as
    /// InProcess, but terminal initial statuses are rejected outright.
    #[tracing::instrument(skip(self, lines))]
    pub async fn create(
        &self,
        client_id: ClientId,
        lines: Vec<NewOrderLine>,
        status: Option<OrderStatus>,
    ) -> Result<Order, DomainError> {
        self.store.get_client(client_id).await?;
        let status = status.unwrap_or_default();
        if status.is_terminal() {
            return Err(DomainError::InvalidArgument(format!(
                "an order cannot be created in the {status} status"
            )));
        }
        let lines = self.build_lines(lines).await?;

        let order = self
            .store
            .insert_order(Order::new(client_id, lines, status))
            .await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, "order created");
        Ok(order)
    }

    /// Replaces the order's client and lines. Status and creation timestamp
    /// are preserved; use [`OrderService::transition`] to move the
    /// lifecycle. Terminal orders are frozen.
    #[tracing::instrument(skip(self, lines))]
    pub async fn update(
        &self,
        id: OrderId,
        client_id: ClientId,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, DomainError> {
        let existing = self.store.get_order(id).await?;
        if existing.status.is_terminal() {
            return Err(DomainError::InvalidState(format!(
                "order {id} is {} and can no longer be modified",
                existing.status
            )));
        }
        self.store.get_client(client_id).await?;
        let lines = self.build_lines(lines).await?;

        Ok(self
            .store
            .update_order(Order {
                client_id,
                lines,
                ..existing
            })
            .await?)
    }

    /// Moves the order to `target` per the lifecycle table.
    ///
    /// Completing an order decrements the stock of every line first, all or
    /// nothing; if any product falls short the order stays in its current
    /// status and no stock changes. The status write happens only after the
    /// decrement succeeded.
    #[tracing::instrument(skip(self))]
    pub async fn transition(&self, id: OrderId, target: OrderStatus) -> Result<Order, DomainError> {
        let mut order = self.store.get_order(id).await?;
        if !order.status.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: order.status,
                to: target,
            });
        }

        if target == OrderStatus::Completed {
            let lines: Vec<(ProductId, u32)> = order
                .lines
                .iter()
                .map(|l| (l.product_id, l.quantity))
                .collect();
            self.store.decrement_product_stock_batch(&lines).await?;
            metrics::counter!("orders_completed_total").increment(1);
        }

        let from = order.status;
        order.status = target;
        let order = self.store.update_order(order).await?;
        tracing::info!(order_id = %order.id, %from, to = %target, "order status changed");
        Ok(order)
    }

    /// Hard-deletes an order. Only Pending orders may be deleted, and never
    /// one that already has a sale attached.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), DomainError> {
        let order = self.store.get_order(id).await?;
        if order.status != OrderStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "only PENDING orders can be deleted, order {id} is {}",
                order.status
            )));
        }
        if self.store.sale_for_order(id).await?.is_some() {
            return Err(DomainError::InvalidState(format!(
                "order {id} has a sale attached"
            )));
        }
        Ok(self.store.delete_order(id).await?)
    }

    pub async fn get(&self, id: OrderId) -> Result<Order, DomainError> {
        Ok(self.store.get_order(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list_orders().await?)
    }

    pub async fn by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.orders_by_status(status).await?)
    }

    pub async fn for_client(&self, client_id: ClientId) -> Result<Vec<Order>, DomainError> {
        self.store.get_client(client_id).await?;
        Ok(self.store.orders_for_client(client_id).await?)
    }

    pub async fn open(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.open_orders().await?)
    }

    pub async fn created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, DomainError> {
        if from > to {
            return Err(DomainError::InvalidArgument(
                "range start must not exceed range end".into(),
            ));
        }
        Ok(self.store.orders_created_between(from, to).await?)
    }

    /// Totals the order at the products' current prices.
    pub async fn total(&self, id: OrderId) -> Result<Money, DomainError> {
        let order = self.store.get_order(id).await?;
        let mut total = Money::zero();
        for line in &order.lines {
            let product = self.store.get_product(line.product_id).await?;
            total += product.price.multiply(line.quantity);
        }
        Ok(total)
    }
}
