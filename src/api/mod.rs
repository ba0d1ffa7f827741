//! HTTP surface of the storefront.
//!
//! Config writes and the order back office require an admin account sent as
//! HTTP Basic credentials; see [`RequireAdmin`].

mod auth;
mod error;
mod handlers;

use axum::{routing::{get, post, put}, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::accounts::AccountService;
use crate::catalog::CatalogService;
use crate::checkout::CheckoutService;
use crate::config::ConfigService;
use crate::orders::OrderService;
use crate::pricing::PricingPolicy;
use crate::storage::DataStore;

pub use auth::RequireAdmin;
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub config: ConfigService,
    pub accounts: AccountService,
    pub checkout: CheckoutService,
    pub orders: OrderService,
}

impl AppState {
    pub fn new(store: DataStore, policy: PricingPolicy, promo_length: chrono::Duration) -> Self {
        let config = ConfigService::new(store.clone());
        Self {
            catalog: CatalogService::new(store.clone()),
            accounts: AccountService::new(store.clone()).with_promo_length(promo_length),
            checkout: CheckoutService::new(store.clone(), config.clone(), policy),
            orders: OrderService::new(store),
            config,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "voltio-storefront"})) }))
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/:id", get(handlers::get_product))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/brands", get(handlers::list_brands))
        .route("/api/services", get(handlers::list_services))
        .route("/api/banners", get(handlers::list_banners))
        .route("/api/config", get(handlers::get_config).put(handlers::put_config))
        .route("/api/checkout/quote", post(handlers::quote))
        .route("/api/checkout", post(handlers::checkout))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/orders", get(handlers::list_orders))
        .route("/api/orders/:id", get(handlers::get_order))
        .route("/api/orders/:id/status", put(handlers::set_order_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
