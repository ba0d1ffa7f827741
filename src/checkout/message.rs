//! The plain-text order message handed to the shop over WhatsApp.
//!
//! Customer service reads these by eye, so section order and labels are
//! fixed: header, customer, items, subtotal, discounts, delivery, address,
//! shipping, total, payment, notes.

use crate::domain::aggregates::{DeliveryMethod, Order};
use crate::domain::value_objects::{format_amount, phone_digits};

pub fn order_message(order: &Order, store_name: &str) -> String {
    let customer = order.customer();
    let breakdown = order.breakdown();

    let mut lines = vec![format!("*New order #{}* - {}", order.reference(), store_name), String::new()];

    lines.push("*Customer*".to_string());
    lines.push(format!("Name: {}", customer.name));
    lines.push(format!("Phone: {}", customer.phone));
    if let Some(email) = customer.email.as_deref().filter(|e| !e.is_empty()) {
        lines.push(format!("Email: {email}"));
    }
    lines.extend(customer.extra.iter().map(|f| format!("{}: {}", f.label, f.value)));
    lines.push(String::new());

    lines.push("*Items*".to_string());
    lines.extend(order.items().iter().map(|i| format!("{} x {} - {}", i.quantity, i.name, format_amount(i.line_total()))));
    lines.push(String::new());

    lines.push(format!("Subtotal: {}", format_amount(breakdown.subtotal)));
    lines.extend(breakdown.discounts.iter().map(|d| format!("{} (-{}): -{}", d.label, d.percent, format_amount(d.amount))));
    match order.delivery() {
        DeliveryMethod::Shipping => {
            lines.push("Delivery: Shipping".to_string());
            if let Some(address) = customer.address.as_deref().filter(|a| !a.is_empty()) {
                lines.push(format!("Address: {address}"));
            }
        }
        DeliveryMethod::Pickup => lines.push("Delivery: Store pickup".to_string()),
    }
    lines.push(format!("Shipping: {}", format_amount(breakdown.shipping)));
    lines.push(format!("*Total: {}*", format_amount(breakdown.total)));
    lines.push(format!("Payment: {}", order.payment_method()));

    if let Some(notes) = order.notes() {
        lines.push(String::new());
        lines.push(format!("Notes: {notes}"));
    }
    lines.join("\n").trim_end().to_string()
}

/// `https://wa.me/<digits>?text=<encoded message>`.
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone_digits(phone), urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{CartItem, CustomerDetails, ExtraField, NewOrder};
    use crate::domain::value_objects::Percent;
    use crate::pricing::{compute_breakdown, PaymentMethod, PricingPolicy};
    use rust_decimal::Decimal;

    fn order(delivery: DeliveryMethod, notes: Option<&str>) -> Order { order_with_email(delivery, notes, "ana@shop.com") }

    fn order_with_email(delivery: DeliveryMethod, notes: Option<&str>, email: &str) -> Order {
        let items = vec![
            CartItem { product_id: "p1".into(), name: "LED panel".into(), unit_price: Decimal::from(500), discount: Some(Percent::from_int(20)), quantity: 2 },
            CartItem { product_id: "p2".into(), name: "Cable 2.5mm".into(), unit_price: Decimal::from(200), discount: None, quantity: 1 },
        ];
        let transfer = PaymentMethod { id: "transfer".into(), label: "Bank transfer".into(), active: true, discount: Percent::from_int(10) };
        let breakdown = compute_breakdown(&items, Some(&transfer), true, &PricingPolicy::default()).unwrap();
        Order::place(NewOrder {
            user_id: Some("u1".into()),
            customer: CustomerDetails {
                name: "Ana Pérez".into(), phone: "+54 11 5555-1234".into(), email: Some(email.into()),
                address: Some("Calle 1 & 2".into()), extra: vec![ExtraField { label: "Tax ID".into(), value: "20-1".into() }],
            },
            items, breakdown, delivery, payment_method: "Bank transfer".into(), notes: notes.map(String::from),
        }).unwrap()
    }

    #[test]
    fn test_message_sections_in_order() {
        let o = order(DeliveryMethod::Shipping, Some("Ring twice"));
        let msg = order_message(&o, "Voltio");
        let expected_body = "\n\n*Customer*\nName: Ana Pérez\nPhone: +54 11 5555-1234\nEmail: ana@shop.com\nTax ID: 20-1\n\n\
*Items*\n2 x LED panel - $800.00\n1 x Cable 2.5mm - $200.00\n\n\
Subtotal: $1000.00\nBank transfer (-10%): -$100.00\nWelcome promotion (-10%): -$100.00\n\
Delivery: Shipping\nAddress: Calle 1 & 2\nShipping: $0.00\n*Total: $800.00*\nPayment: Bank transfer\n\nNotes: Ring twice";
        assert!(msg.starts_with(&format!("*New order #{}* - Voltio", o.reference())));
        assert!(msg.ends_with(expected_body), "{msg}");
    }

    #[test]
    fn test_pickup_omits_address_and_empty_notes() {
        let msg = order_message(&order(DeliveryMethod::Pickup, None), "Voltio");
        assert!(msg.contains("Delivery: Store pickup\nShipping: $0.00"));
        assert!(!msg.contains("Address:"));
        assert!(!msg.contains("Notes:"));
        assert!(msg.ends_with("Payment: Bank transfer"));
    }

    #[test]
    fn test_blank_email_omitted() {
        let o = order_with_email(DeliveryMethod::Pickup, Some("Leave at gate"), "");
        let msg = order_message(&o, "Voltio");
        assert!(msg.contains("Phone: +54 11 5555-1234\nTax ID: 20-1\n\n*Items*"));
        assert!(msg.ends_with("Payment: Bank transfer\n\nNotes: Leave at gate"));
    }

    #[test]
    fn test_whatsapp_link_encodes() {
        let link = whatsapp_link("+54 9 11 0000-0000", "Hi & bye\n*Total*");
        assert_eq!(link, "https://wa.me/5491100000000?text=Hi%20%26%20bye%0A%2ATotal%2A");
    }
}
