//! Sale service: recording revenue against completed orders.

use chrono::{DateTime, Utc};
use serde::Serialize;
use store::entities::{OrderStatus, Sale};
use store::{OrderStore, SaleStore};
use common::{ClientId, Money, OrderId, SaleId};

use crate::{DomainError, validate};

/// Aggregate figures over a set of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleStats {
    pub count: usize,
    pub total: Money,
    /// Total divided by count, zero when there are no sales.
    pub average: Money,
}

impl SaleStats {
    fn over(sales: &[Sale]) -> Self {
        let count = sales.len();
        let total: Money = sales.iter().map(|s| s.price).sum();
        let average = if count == 0 {
            Money::zero()
        } else {
            Money::from_cents(total.cents() / count as i64)
        };
        Self {
            count,
            total,
            average,
        }
    }
}

/// Service for managing sales.
#[derive(Clone)]
pub struct SaleService<S> {
    store: S,
}

impl<S: SaleStore + OrderStore> SaleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a sale for an order.
    ///
    /// The order must exist and be Completed, the price strictly positive,
    /// and no other sale may already reference the same order. Checks run
    /// in that sequence so the most specific failure wins.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        order_id: OrderId,
        price: Money,
        notes: Option<String>,
    ) -> Result<Sale, DomainError> {
        let order = self.store.get_order(order_id).await?;
        if order.status != OrderStatus::Completed {
            return Err(DomainError::InvalidState(format!(
                "a sale requires a COMPLETED order, order {order_id} is {}",
                order.status
            )));
        }
        validate::positive_price("price", price)?;
        if self.store.sale_for_order(order_id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "order {order_id} already has a sale"
            )));
        }

        let sale = self.store.insert_sale(Sale::new(order_id, price, notes)).await?;
        metrics::counter!("sales_recorded_total").increment(1);
        tracing::info!(sale_id = %sale.id, %order_id, "sale recorded");
        Ok(sale)
    }

    /// Updates price and notes. Order linkage and timestamps are fixed.
    pub async fn update(
        &self,
        id: SaleId,
        price: Money,
        notes: Option<String>,
    ) -> Result<Sale, DomainError> {
        let existing = self.store.get_sale(id).await?;
        validate::positive_price("price", price)?;
        Ok(self
            .store
            .update_sale(Sale {
                price,
                notes,
                ..existing
            })
            .await?)
    }

    /// Stamps the delivery timestamp. Delivery is registered at most once.
    #[tracing::instrument(skip(self))]
    pub async fn register_delivery(&self, id: SaleId) -> Result<Sale, DomainError> {
        let mut sale = self.store.get_sale(id).await?;
        if sale.delivered_at.is_some() {
            return Err(DomainError::InvalidState(format!(
                "sale {id} was already delivered"
            )));
        }
        sale.delivered_at = Some(Utc::now());
        Ok(self.store.update_sale(sale).await?)
    }

    pub async fn delete(&self, id: SaleId) -> Result<(), DomainError> {
        Ok(self.store.delete_sale(id).await?)
    }

    pub async fn get(&self, id: SaleId) -> Result<Sale, DomainError> {
        Ok(self.store.get_sale(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Sale>, DomainError> {
        Ok(self.store.list_sales().await?)
    }

    pub async fn for_order(&self, order_id: OrderId) -> Result<Option<Sale>, DomainError> {
        Ok(self.store.sale_for_order(order_id).await?)
    }

    pub async fn for_client(&self, client_id: ClientId) -> Result<Vec<Sale>, DomainError> {
        Ok(self.store.sales_for_client(client_id).await?)
    }

    pub async fn created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, DomainError> {
        if from > to {
            return Err(DomainError::InvalidArgument(
                "range start must not exceed range end".into(),
            ));
        }
        Ok(self.store.sales_created_between(from, to).await?)
    }

    pub async fn delivered_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, DomainError> {
        if from > to {
            return Err(DomainError::InvalidArgument(
                "range start must not exceed range end".into(),
            ));
        }
        Ok(self.store.sales_delivered_between(from, to).await?)
    }

    pub async fn by_price_range(&self, min: Money, max: Money) -> Result<Vec<Sale>, DomainError> {
        if min > max {
            return Err(DomainError::InvalidArgument(
                "min price must not exceed max price".into(),
            ));
        }
        Ok(self.store.sales_by_price_range(min, max).await?)
    }

    /// Aggregate figures over the sales created in the given window.
    pub async fn stats_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SaleStats, DomainError> {
        let sales = self.created_between(from, to).await?;
        Ok(SaleStats::over(&sales))
    }
}
