//! Site configuration: the document the storefront and back-office render from.
//!
//! The document is read and written whole. Loading always yields a complete
//! document: stored sections override the defaults and missing sections are
//! filled in (see [`reconcile`]).

pub mod defaults;
pub mod reconcile;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::pricing::PaymentMethod;
use crate::storage::{Collection, DataStore, Fetched, StoreError, WriteOutcome};

pub use defaults::default_site_config;
pub use reconcile::{reconcile, reconcile_serialized};

/// Id under which the site document is stored.
pub const CONFIG_ID: &str = "site";

/// A reconciled site configuration document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteConfig(Value);

/// A field the shopper fills in at checkout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_field_type() -> String { "text".to_string() }
fn default_true() -> bool { true }

impl SiteConfig {
    pub fn defaults() -> Self { Self(default_site_config()) }

    pub fn as_value(&self) -> &Value { &self.0 }

    pub fn store_name(&self) -> &str {
        self.0.get("storeName").and_then(Value::as_str).unwrap_or_default()
    }

    /// The number orders are sent to: the checkout's own, else the contact one.
    pub fn whatsapp_number(&self) -> Option<&str> {
        [self.0.pointer("/checkout/whatsappNumber"), self.0.pointer("/contact/whatsapp")]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|n| !n.trim().is_empty())
    }

    /// Configured payment methods; entries that do not parse are skipped.
    pub fn payment_methods(&self) -> Vec<PaymentMethod> {
        self.list_at("/checkout/paymentMethods")
    }

    pub fn payment_method(&self, id: &str) -> Option<PaymentMethod> {
        self.payment_methods().into_iter().find(|m| m.id == id)
    }

    /// Enabled checkout fields, in display order.
    pub fn checkout_fields(&self) -> Vec<CheckoutField> {
        self.list_at::<CheckoutField>("/checkout/fields").into_iter().filter(|f| f.enabled).collect()
    }

    pub fn feature_enabled(&self, name: &str) -> bool {
        self.0.pointer(&format!("/features/{name}")).and_then(Value::as_bool).unwrap_or(false)
    }

    fn list_at<T: serde::de::DeserializeOwned>(&self, pointer: &str) -> Vec<T> {
        self.0.pointer(pointer).and_then(Value::as_array).map(|entries| {
            entries.iter().filter_map(|e| serde_json::from_value(e.clone()).ok()).collect()
        }).unwrap_or_default()
    }
}

/// Loads and saves the site document through the data store.
#[derive(Clone)]
pub struct ConfigService {
    store: DataStore,
    defaults: Value,
}

impl ConfigService {
    pub fn new(store: DataStore) -> Self { Self::with_defaults(store, default_site_config()) }

    pub fn with_defaults(store: DataStore, defaults: Value) -> Self { Self { store, defaults } }

    /// Never fails. When nothing is stored yet the defaults are written back
    /// first, so the next load finds a document instead of seeding again.
    pub async fn load(&self) -> SiteConfig {
        match self.store.fetch_raw(Collection::Config, CONFIG_ID).await {
            Fetched::Found(Value::String(raw)) => SiteConfig(reconcile_serialized(&self.defaults, &raw)),
            Fetched::Found(doc) => SiteConfig(reconcile(&self.defaults, &without_storage_id(doc))),
            Fetched::Unreadable => SiteConfig(self.defaults.clone()),
            Fetched::Missing => {
                info!("no site config stored, seeding defaults");
                let seeded = self.defaults.clone();
                if let Err(e) = self.persist(&seeded).await {
                    warn!(error = %e, "could not seed site config");
                }
                SiteConfig(seeded)
            }
        }
    }

    /// Reconciles `candidate` and stores the result wholesale. A client-sent
    /// `id` is dropped; the document is always stored under [`CONFIG_ID`].
    pub async fn save(&self, candidate: &Value) -> Result<(SiteConfig, WriteOutcome), StoreError> {
        let config = reconcile(&self.defaults, &without_storage_id(candidate.clone()));
        let outcome = self.persist(&config).await?;
        Ok((SiteConfig(config), outcome))
    }

    async fn persist(&self, config: &Value) -> Result<WriteOutcome, StoreError> {
        let mut doc = config.clone();
        if let Some(obj) = doc.as_object_mut() { obj.insert("id".to_string(), Value::from(CONFIG_ID)); }
        self.store.save_raw(Collection::Config, &doc).await
    }
}

fn without_storage_id(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() { obj.remove("id"); }
    doc
}
