//! Order pricing: subtotal, discounts and total for a cart.
//!
//! Payment-method and promotional discounts are each taken from the same
//! subtotal and subtracted side by side. They are not compounded: 10% + 10%
//! off 1000 is 800, never 810.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::aggregates::CartItem;
use crate::domain::value_objects::{format_amount, Percent};

/// Shipping charged on every order unless the policy overrides it.
pub const DEFAULT_SHIPPING: Decimal = Decimal::ZERO;

/// Flat discount for signed-in shoppers inside the promotional window.
pub const PROMOTION_PERCENT: i64 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub label: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub discount: Percent,
}

fn default_active() -> bool { true }

/// Knobs of the pricing calculation that are not part of the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingPolicy {
    pub shipping: Decimal,
    pub promotion: Percent,
    pub promotion_label: String,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self { shipping: DEFAULT_SHIPPING, promotion: Percent::from_int(PROMOTION_PERCENT), promotion_label: "Welcome promotion".to_string() }
    }
}

impl PricingPolicy {
    pub fn with_shipping(mut self, shipping: Decimal) -> Self { self.shipping = shipping.max(Decimal::ZERO); self }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscountLine {
    pub label: String,
    pub percent: Percent,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discounts: Vec<DiscountLine>,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// One line per figure, in the order the checkout shows them.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Subtotal: {}", format_amount(self.subtotal))];
        for d in &self.discounts {
            lines.push(format!("{} (-{}): -{}", d.label, d.percent, format_amount(d.amount)));
        }
        lines.push(format!("Shipping: {}", format_amount(self.shipping)));
        lines.push(format!("Total: {}", format_amount(self.total)));
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i32 },
    #[error("negative price for product {0}")]
    NegativePrice(String),
}

/// Prices a cart.
///
/// Every item is checked before anything is summed, so a bad line never
/// produces a partial result. Amounts are exact decimals; rounding is left to
/// whoever displays them.
pub fn compute_breakdown(
    items: &[CartItem],
    payment: Option<&PaymentMethod>,
    promotion_active: bool,
    policy: &PricingPolicy,
) -> Result<PriceBreakdown, PricingError> {
    for item in items {
        if item.quantity < 1 {
            return Err(PricingError::InvalidQuantity { product_id: item.product_id.clone(), quantity: item.quantity });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(PricingError::NegativePrice(item.product_id.clone()));
        }
    }

    let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();

    let mut discounts = Vec::new();
    if let Some(method) = payment.filter(|m| m.active && !m.discount.is_zero()) {
        discounts.push(DiscountLine { label: method.label.clone(), percent: method.discount, amount: method.discount.of(subtotal) });
    }
    if promotion_active && !policy.promotion.is_zero() {
        discounts.push(DiscountLine { label: policy.promotion_label.clone(), percent: policy.promotion, amount: policy.promotion.of(subtotal) });
    }

    let discounted = (subtotal - discounts.iter().map(|d| d.amount).sum::<Decimal>()).max(Decimal::ZERO);
    Ok(PriceBreakdown { subtotal, discounts, shipping: policy.shipping, total: discounted + policy.shipping })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: Decimal, discount: Option<i64>, qty: i32) -> CartItem {
        CartItem { product_id: id.into(), name: id.into(), unit_price: price, discount: discount.map(Percent::from_int), quantity: qty }
    }

    fn card(discount: i64) -> PaymentMethod {
        PaymentMethod { id: "transfer".into(), label: "Bank transfer".into(), active: true, discount: Percent::from_int(discount) }
    }

    #[test]
    fn test_subtotal_is_exact_sum() {
        let items = vec![
            item("a", Decimal::new(1999, 2), Some(15), 3),
            item("b", Decimal::new(333, 2), None, 7),
            item("c", Decimal::new(10, 0), Some(0), 1),
        ];
        let b = compute_breakdown(&items, None, false, &PricingPolicy::default()).unwrap();
        // 19.99 * 0.85 * 3 + 3.33 * 7 + 10
        let expected = Decimal::new(1999, 2) * Decimal::new(85, 2) * Decimal::from(3) + Decimal::new(2331, 2) + Decimal::from(10);
        assert_eq!(b.subtotal, expected);
        assert_eq!(b.total, expected);
        assert!(b.discounts.is_empty());
    }

    #[test]
    fn test_payment_and_promotion_are_additive() {
        let items = vec![item("a", Decimal::from(1000), None, 1)];
        let b = compute_breakdown(&items, Some(&card(10)), true, &PricingPolicy::default()).unwrap();
        assert_eq!(b.subtotal, Decimal::from(1000));
        assert_eq!(b.discounts.len(), 2);
        assert_eq!(b.discounts[0].amount, Decimal::from(100));
        assert_eq!(b.discounts[1].amount, Decimal::from(100));
        assert_eq!(b.total, Decimal::from(800));
    }

    #[test]
    fn test_promotion_inactive_or_zero_payment_adds_no_line() {
        let items = vec![item("a", Decimal::from(50), None, 2)];
        let b = compute_breakdown(&items, Some(&card(0)), false, &PricingPolicy::default()).unwrap();
        assert!(b.discounts.is_empty());
        assert_eq!(b.total, Decimal::from(100));
    }

    #[test]
    fn test_inactive_payment_method_ignored() {
        let items = vec![item("a", Decimal::from(100), None, 1)];
        let method = PaymentMethod { active: false, ..card(20) };
        let b = compute_breakdown(&items, Some(&method), false, &PricingPolicy::default()).unwrap();
        assert_eq!(b.total, Decimal::from(100));
    }

    #[test]
    fn test_shipping_override() {
        let items = vec![item("a", Decimal::from(100), None, 1)];
        let policy = PricingPolicy::default().with_shipping(Decimal::from(15));
        let b = compute_breakdown(&items, Some(&card(10)), false, &policy).unwrap();
        assert_eq!(b.total, Decimal::from(105));
    }

    #[test]
    fn test_out_of_range_discounts_clamped() {
        let items = vec![item("a", Decimal::from(100), Some(250), 1), item("b", Decimal::from(100), Some(-20), 1)];
        let b = compute_breakdown(&items, None, false, &PricingPolicy::default()).unwrap();
        assert_eq!(b.subtotal, Decimal::from(100));
    }

    #[test]
    fn test_total_never_negative() {
        let items = vec![item("a", Decimal::from(100), None, 1)];
        let b = compute_breakdown(&items, Some(&card(100)), true, &PricingPolicy::default()).unwrap();
        assert_eq!(b.total, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_bad_quantity_and_price() {
        let err = compute_breakdown(&[item("a", Decimal::from(1), None, -2)], None, false, &PricingPolicy::default()).unwrap_err();
        assert_eq!(err, PricingError::InvalidQuantity { product_id: "a".into(), quantity: -2 });
        let err = compute_breakdown(&[item("b", Decimal::from(-1), None, 1)], None, false, &PricingPolicy::default()).unwrap_err();
        assert_eq!(err, PricingError::NegativePrice("b".into()));
    }

    #[test]
    fn test_repeated_calls_identical() {
        let items = vec![item("a", Decimal::new(3333, 2), Some(33), 3)];
        let first = compute_breakdown(&items, Some(&card(7)), true, &PricingPolicy::default()).unwrap();
        for _ in 0..10 {
            assert_eq!(compute_breakdown(&items, Some(&card(7)), true, &PricingPolicy::default()).unwrap(), first);
        }
    }

    #[test]
    fn test_summary_lines() {
        let items = vec![item("a", Decimal::from(1000), None, 1)];
        let b = compute_breakdown(&items, Some(&card(10)), false, &PricingPolicy::default()).unwrap();
        assert_eq!(b.summary_lines(), vec![
            "Subtotal: $1000.00".to_string(),
            "Bank transfer (-10%): -$100.00".to_string(),
            "Shipping: $0.00".to_string(),
            "Total: $900.00".to_string(),
        ]);
    }
}
