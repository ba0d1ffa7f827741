//! Checkout: validate the shopper's form, price the cart, record a pending
//! order and build the WhatsApp hand-off.

pub mod message;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

use crate::config::{ConfigService, SiteConfig};
use crate::domain::aggregates::{CartItem, CustomerDetails, DeliveryMethod, ExtraField, NewOrder, Order, OrderError, Product, SessionUser};
use crate::forms::{field_errors, validate_phone, FieldError};
use crate::pricing::{compute_breakdown, PaymentMethod, PriceBreakdown, PricingError, PricingPolicy};
use crate::promo::PromotionalWindow;
use crate::storage::{DataStore, StoreError, WriteOutcome};

pub use message::{order_message, whatsapp_link};

/// Field ids that map onto [`CustomerDetails`] instead of the extra answers.
const BUILTIN_FIELDS: [&str; 4] = ["name", "phone", "email", "address"];

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("validation failed")]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no WhatsApp number configured")]
    NoWhatsappNumber,
}

/// What the shopper typed into the checkout form.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "Enter your name"))]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Answers to configured fields beyond the built-in ones, by field id.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    #[serde(default)]
    pub delivery: DeliveryMethod,
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutForm {
    fn normalized(mut self) -> Self {
        fn clean(v: Option<String>) -> Option<String> { v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) }
        self.name = self.name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.email = clean(self.email);
        self.address = clean(self.address);
        self.notes = clean(self.notes);
        self.extra = self.extra.into_iter().map(|(k, v)| (k, v.trim().to_string())).filter(|(_, v)| !v.is_empty()).collect();
        self
    }

    fn builtin(&self, id: &str) -> Option<&str> {
        match id {
            "name" => Some(self.name.as_str()).filter(|s| !s.is_empty()),
            "phone" => Some(self.phone.as_str()).filter(|s| !s.is_empty()),
            "email" => self.email.as_deref(),
            "address" => self.address.as_deref(),
            _ => None,
        }
    }
}

/// A requested cart line: which product and how many.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i32,
}

/// Who is buying, as far as pricing cares.
#[derive(Clone, Debug, Default)]
pub struct Buyer {
    pub user: Option<SessionUser>,
    pub promotion: Option<PromotionalWindow>,
}

impl Buyer {
    pub fn promotion_active(&self, now: DateTime<Utc>) -> bool {
        self.promotion.is_some_and(|w| w.applies(now, self.user.is_some()))
    }
}

#[derive(Clone, Debug)]
pub struct PlacedOrder {
    pub order: Order,
    pub message: String,
    pub whatsapp_url: String,
    pub stored: WriteOutcome,
}

#[derive(Clone)]
pub struct CheckoutService {
    store: DataStore,
    config: ConfigService,
    policy: PricingPolicy,
}

impl CheckoutService {
    pub fn new(store: DataStore, config: ConfigService, policy: PricingPolicy) -> Self { Self { store, config, policy } }

    /// Builds cart items from current catalog data. Unknown or inactive
    /// products are reported per line.
    pub async fn resolve_cart(&self, lines: &[CartLine]) -> Result<Vec<CartItem>, CheckoutError> {
        let catalog = self.store.list::<Product>().await;
        let mut items = Vec::with_capacity(lines.len());
        let mut errors = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            match catalog.iter().find(|p| p.id() == line.product_id && p.is_active()) {
                Some(product) => items.push(CartItem::from_product(product, line.quantity)),
                None => errors.push(FieldError::new(format!("items[{i}]"), format!("Product {} is not available", line.product_id))),
            }
        }
        if errors.is_empty() { Ok(items) } else { Err(CheckoutError::Invalid(errors)) }
    }

    /// Prices items without placing anything.
    pub async fn quote(&self, items: &[CartItem], payment_method: Option<&str>, buyer: &Buyer, now: DateTime<Utc>) -> Result<PriceBreakdown, CheckoutError> {
        let config = self.config.load().await;
        let method = match payment_method {
            Some(id) => Some(active_method(&config, id)?),
            None => None,
        };
        Ok(compute_breakdown(items, method.as_ref(), buyer.promotion_active(now), &self.policy)?)
    }

    pub async fn place_order(&self, form: CheckoutForm, items: Vec<CartItem>, buyer: &Buyer, now: DateTime<Utc>) -> Result<PlacedOrder, CheckoutError> {
        let config = self.config.load().await;
        let form = form.normalized();
        validate_form(&form, &config)?;
        let method = active_method(&config, &form.payment_method)?;
        let phone = config.whatsapp_number().ok_or(CheckoutError::NoWhatsappNumber)?.to_string();

        let breakdown = compute_breakdown(&items, Some(&method), buyer.promotion_active(now), &self.policy)?;
        let customer = customer_details(&form, &config);
        let mut order = Order::place(NewOrder {
            user_id: buyer.user.as_ref().map(|u| u.id.clone()),
            customer, items, breakdown, delivery: form.delivery, payment_method: method.label.clone(), notes: form.notes,
        })?;
        for event in order.take_events() { debug!(?event, "domain event"); }

        let stored = self.store.save(&order).await?;
        info!(order_id = %order.id(), total = %order.breakdown().total, ?stored, "order placed");

        let message = order_message(&order, config.store_name());
        let whatsapp_url = whatsapp_link(&phone, &message);
        Ok(PlacedOrder { order, message, whatsapp_url, stored })
    }
}

fn active_method(config: &SiteConfig, id: &str) -> Result<PaymentMethod, CheckoutError> {
    config.payment_method(id).filter(|m| m.active)
        .ok_or_else(|| CheckoutError::Invalid(vec![FieldError::new("paymentMethod", "Choose a payment method")]))
}

/// Runs the fixed rules plus the shop's configured required fields.
/// Nothing is stored when this fails.
fn validate_form(form: &CheckoutForm, config: &SiteConfig) -> Result<(), CheckoutError> {
    let mut errors = match form.validate() {
        Ok(()) => Vec::new(),
        Err(e) => field_errors(&e),
    };
    let mut flag = |field: &str, message: &str| {
        if !errors.iter().any(|e| e.field == field) { errors.push(FieldError::new(field, message)); }
    };
    if form.delivery == DeliveryMethod::Shipping && form.address.is_none() {
        flag("address", "Enter a delivery address");
    }
    for field in config.checkout_fields().into_iter().filter(|f| f.required) {
        let answered = if BUILTIN_FIELDS.contains(&field.id.as_str()) {
            form.builtin(&field.id).is_some()
        } else {
            form.extra.contains_key(&field.id)
        };
        if !answered { flag(&field.id, &format!("{} is required", field.label)); }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(CheckoutError::Invalid(errors))
    }
}

fn customer_details(form: &CheckoutForm, config: &SiteConfig) -> CustomerDetails {
    let labels: BTreeMap<String, String> = config.checkout_fields().into_iter().map(|f| (f.id, f.label)).collect();
    let mut extra: Vec<ExtraField> = Vec::new();
    // Configured fields first, in their display order, then anything else sent.
    for field in config.checkout_fields() {
        if let Some(value) = form.extra.get(&field.id) {
            extra.push(ExtraField { label: field.label, value: value.clone() });
        }
    }
    for (id, value) in &form.extra {
        if !labels.contains_key(id) { extra.push(ExtraField { label: id.clone(), value: value.clone() }); }
    }
    CustomerDetails {
        name: form.name.clone(),
        phone: form.phone.clone(),
        email: form.email.clone(),
        address: if form.delivery == DeliveryMethod::Shipping { form.address.clone() } else { None },
        extra,
    }
}
