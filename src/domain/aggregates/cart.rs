//! Cart Aggregate
//!
//! Lives only in the shopper's session; it is copied into an [`Order`](super::Order)
//! at checkout and never persisted on its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::Product;
use crate::domain::value_objects::Percent;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Option<Percent>,
    pub quantity: i32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id().to_string(), name: product.name().to_string(),
            unit_price: product.price(), discount: product.discount(), quantity,
        }
    }

    /// Unit price after the item's own discount; a zero or absent discount leaves it untouched.
    pub fn effective_unit_price(&self) -> Decimal {
        match self.discount {
            Some(d) if !d.is_zero() => self.unit_price * d.complement(),
            _ => self.unit_price,
        }
    }

    pub fn line_total(&self) -> Decimal { self.effective_unit_price() * Decimal::from(self.quantity) }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity < 1 { return Err(CartError::InvalidQuantity(item.quantity)); }
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i32) -> Result<(), CartError> {
        if quantity < 0 { return Err(CartError::InvalidQuantity(quantity)); }
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound)?;
        if quantity == 0 { self.items.retain(|i| i.product_id != product_id); }
        else { item.quantity = quantity; }
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn subtotal(&self) -> Decimal { self.items.iter().map(CartItem::line_total).sum() }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),
}
