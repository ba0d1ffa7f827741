//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::value_objects::Percent;
use crate::domain::events::{DomainEvent, ProductEvent};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    discount: Option<Percent>,
    #[serde(default)]
    stock: u32,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    brand_id: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    featured: bool,
    #[serde(default = "default_active")]
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

fn default_active() -> bool { true }

impl Product {
    pub fn create(name: impl Into<String>, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(), name: name.into(), description: String::new(),
            price: price.max(Decimal::ZERO), discount: None, stock: 0, category_id: None, brand_id: None,
            image_url: None, featured: false, active: true, created_at: now, updated_at: now, events: vec![],
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn description(&self) -> &str { &self.description }
    pub fn price(&self) -> Decimal { self.price }
    pub fn discount(&self) -> Option<Percent> { self.discount }
    pub fn stock(&self) -> u32 { self.stock }
    pub fn category_id(&self) -> Option<&str> { self.category_id.as_deref() }
    pub fn brand_id(&self) -> Option<&str> { self.brand_id.as_deref() }
    pub fn image_url(&self) -> Option<&str> { self.image_url.as_deref() }
    pub fn is_featured(&self) -> bool { self.featured }
    pub fn is_active(&self) -> bool { self.active }
    pub fn is_in_stock(&self) -> bool { self.stock > 0 }

    /// Unit price after the product's own discount.
    pub fn effective_price(&self) -> Decimal {
        match self.discount {
            Some(d) if !d.is_zero() => self.price * d.complement(),
            _ => self.price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self { self.description = description.into(); self }
    pub fn with_discount(mut self, discount: Percent) -> Self { self.discount = Some(discount); self }
    pub fn with_stock(mut self, stock: u32) -> Self { self.stock = stock; self }
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self { self.category_id = Some(category_id.into()); self }
    pub fn featured(mut self) -> Self { self.featured = true; self }

    pub fn archive(&mut self) { self.active = false; self.touch(); }

    /// Takes `qty` units out of stock, stopping at zero.
    pub fn decrement_stock(&mut self, qty: u32) {
        self.stock = self.stock.saturating_sub(qty);
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::StockDecremented {
            product_id: self.id.clone(), requested: qty, remaining: self.stock,
        }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}
