//! Back-office order handling.

use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::aggregates::{Order, OrderError, OrderStatus, Product};
use crate::storage::{DataStore, StoreError, WriteOutcome};

#[derive(Debug, Error)]
pub enum OrdersError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("order {order_id} updated but stock not adjusted for {}", .product_ids.join(", "))]
    StockNotCommitted { order_id: String, product_ids: Vec<String> },
}

#[derive(Clone)]
pub struct OrderService {
    store: DataStore,
}

impl OrderService {
    pub fn new(store: DataStore) -> Self { Self { store } }

    /// All orders, newest first.
    pub async fn list(&self) -> Vec<Order> {
        let mut orders = self.store.list::<Order>().await;
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        orders
    }

    pub async fn for_user(&self, user_id: &str) -> Vec<Order> {
        self.list().await.into_iter().filter(|o| o.user_id() == Some(user_id)).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Order, OrdersError> {
        self.store.get::<Order>(id).await.ok_or_else(|| OrderError::NotFound(id.to_string()).into())
    }

    /// Moves an order to `status`; nothing is written when it is already
    /// there. The first time an order reaches `completed` every line's
    /// quantity is taken out of stock.
    ///
    /// The order is saved before stock is touched, so a failed product write
    /// leaves that product's stock high but never takes it out twice. Every
    /// product is attempted; the ones left unadjusted are logged and returned
    /// in [`OrdersError::StockNotCommitted`].
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(Order, Option<WriteOutcome>), OrdersError> {
        let mut order = self.get(id).await?;
        let transition = order.transition(status);
        if !transition.changed {
            debug!(order_id = id, ?status, "status unchanged");
            return Ok((order, None));
        }

        let outcome = self.store.save(&order).await?;
        for event in order.take_events() { debug!(?event, "domain event"); }
        info!(order_id = id, ?status, ?outcome, "order status updated");

        if transition.commit_stock {
            let failed = self.commit_stock(&order).await;
            if !failed.is_empty() {
                return Err(OrdersError::StockNotCommitted { order_id: id.to_string(), product_ids: failed });
            }
        }
        Ok((order, Some(outcome)))
    }

    /// Takes each line out of stock and returns the ids whose write failed.
    async fn commit_stock(&self, order: &Order) -> Vec<String> {
        let mut failed = Vec::new();
        for item in order.items() {
            let Some(mut product) = self.store.get::<Product>(&item.product_id).await else {
                error!(order_id = order.id(), product_id = %item.product_id, "product gone, stock not adjusted");
                continue;
            };
            product.decrement_stock(u32::try_from(item.quantity).unwrap_or(0));
            match self.store.save(&product).await {
                Ok(_) => {
                    for event in product.take_events() { debug!(?event, "domain event"); }
                }
                Err(e) => {
                    error!(order_id = order.id(), product_id = %item.product_id, error = %e, "stock not adjusted, fix by hand");
                    failed.push(item.product_id.clone());
                }
            }
        }
        failed
    }
}
