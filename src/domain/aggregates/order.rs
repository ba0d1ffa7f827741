//! Order Aggregate
//!
//! An order is a frozen snapshot of the cart taken at checkout. After
//! placement only its status moves; the first move into `completed` is the
//! point where stock gets committed against the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::CartItem;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::pricing::PriceBreakdown;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    customer: CustomerDetails,
    items: Vec<CartItem>,
    breakdown: PriceBreakdown,
    delivery: DeliveryMethod,
    payment_method: String,
    #[serde(default)]
    notes: Option<String>,
    status: OrderStatus,
    #[serde(default)]
    stock_committed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Answers to the extra checkout fields configured by the shop, in display order.
    #[serde(default)]
    pub extra: Vec<ExtraField>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField { pub label: String, pub value: String }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod { #[default] Shipping, Pickup }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Completed, Cancelled }

/// What a status change asks of the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub changed: bool,
    /// Stock must be taken out for every line. True at most once per order.
    pub commit_stock: bool,
}

/// Everything an order is built from at checkout.
#[derive(Clone, Debug)]
pub struct NewOrder {
    pub user_id: Option<String>,
    pub customer: CustomerDetails,
    pub items: Vec<CartItem>,
    pub breakdown: PriceBreakdown,
    pub delivery: DeliveryMethod,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl Order {
    pub fn place(new: NewOrder) -> Result<Self, OrderError> {
        if new.items.is_empty() { return Err(OrderError::NoItems); }
        let now = Utc::now();
        let notes = new.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let mut order = Self {
            id: Uuid::now_v7().to_string(), user_id: new.user_id, customer: new.customer, items: new.items,
            breakdown: new.breakdown, delivery: new.delivery, payment_method: new.payment_method, notes,
            status: OrderStatus::Pending, stock_committed: false, created_at: now, updated_at: now, events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Placed { order_id: order.id.clone(), total: order.breakdown.total }));
        Ok(order)
    }

    pub fn id(&self) -> &str { &self.id }
    /// Short human reference used in the WhatsApp message.
    pub fn reference(&self) -> String { self.id.chars().filter(|c| *c != '-').take(8).collect::<String>().to_uppercase() }
    pub fn user_id(&self) -> Option<&str> { self.user_id.as_deref() }
    pub fn customer(&self) -> &CustomerDetails { &self.customer }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn breakdown(&self) -> &PriceBreakdown { &self.breakdown }
    pub fn delivery(&self) -> DeliveryMethod { self.delivery }
    pub fn payment_method(&self) -> &str { &self.payment_method }
    pub fn notes(&self) -> Option<&str> { self.notes.as_deref() }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn stock_committed(&self) -> bool { self.stock_committed }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn transition(&mut self, status: OrderStatus) -> Transition {
        if status == self.status { return Transition { changed: false, commit_stock: false }; }
        self.status = status;
        self.touch();
        let event = match status {
            OrderStatus::Completed => OrderEvent::Completed { order_id: self.id.clone() },
            OrderStatus::Cancelled => OrderEvent::Cancelled { order_id: self.id.clone() },
            OrderStatus::Pending => OrderEvent::Reopened { order_id: self.id.clone() },
        };
        self.raise_event(DomainEvent::Order(event));
        let commit_stock = status == OrderStatus::Completed && !self.stock_committed;
        if commit_stock { self.stock_committed = true; }
        Transition { changed: true, commit_stock }
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("No items")]
    NoItems,
    #[error("Order not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::pricing::{compute_breakdown, PricingPolicy};

    fn sample_order() -> Order {
        let items = vec![CartItem { product_id: "P1".into(), name: "Breaker".into(), unit_price: Decimal::new(10, 0), discount: None, quantity: 2 }];
        let breakdown = compute_breakdown(&items, None, false, &PricingPolicy::default()).unwrap();
        Order::place(NewOrder {
            user_id: None, customer: CustomerDetails { name: "Ana".into(), phone: "555".into(), ..Default::default() },
            items, breakdown, delivery: DeliveryMethod::Pickup, payment_method: "Cash".into(), notes: Some("  ".into()),
        }).unwrap()
    }

    #[test]
    fn test_order_workflow() {
        let mut order = sample_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.notes(), None);
        let t = order.transition(OrderStatus::Completed);
        assert!(t.changed && t.commit_stock);
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn test_stock_committed_once() {
        let mut order = sample_order();
        assert!(order.transition(OrderStatus::Completed).commit_stock);
        assert_eq!(order.transition(OrderStatus::Completed), Transition { changed: false, commit_stock: false });
        order.transition(OrderStatus::Pending);
        assert!(!order.transition(OrderStatus::Completed).commit_stock);
    }

    #[test]
    fn test_empty_order_rejected() {
        let breakdown = compute_breakdown(&[], None, false, &PricingPolicy::default()).unwrap();
        let err = Order::place(NewOrder {
            user_id: None, customer: CustomerDetails::default(), items: vec![], breakdown,
            delivery: DeliveryMethod::Shipping, payment_method: "Cash".into(), notes: None,
        }).unwrap_err();
        assert_eq!(err, OrderError::NoItems);
    }

    #[test]
    fn test_events_raised() {
        let mut order = sample_order();
        order.transition(OrderStatus::Cancelled);
        let events = order.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], DomainEvent::Order(OrderEvent::Cancelled { .. })));
    }
}
