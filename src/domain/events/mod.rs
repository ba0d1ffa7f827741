//! Domain events
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProductEvent {
    StockDecremented { product_id: String, requested: u32, remaining: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Placed { order_id: String, total: Decimal },
    Completed { order_id: String },
    Cancelled { order_id: String },
    Reopened { order_id: String },
}
