//! Voltio Storefront
//!
//! Storefront and back-office core for a small electrical-goods shop.
//!
//! ## Features
//! - Catalog of products, categories, brands, services and banners
//! - Cart pricing with payment-method and welcome-promotion discounts
//! - Checkout that hands the order to the shop over WhatsApp
//! - Order status management with a one-time stock commit
//! - Site configuration reconciled against built-in defaults
//! - Remote document store with a local mirror fallback

pub mod accounts;
pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod forms;
pub mod orders;
pub mod pricing;
pub mod promo;
pub mod session;
pub mod settings;
pub mod storage;

pub use api::{router, AppState};
pub use config::{ConfigService, SiteConfig};
pub use pricing::{compute_breakdown, PriceBreakdown, PricingPolicy};
pub use settings::Settings;
pub use storage::{DataStore, LocalMirror};
