use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tracing::info;

use super::auth::RequireAdmin;
use super::error::{ApiError, Result};
use super::AppState;
use crate::accounts::{LoginForm, RegistrationForm};
use crate::checkout::{Buyer, CartLine, CheckoutForm};
use crate::config::SiteConfig;
use crate::domain::aggregates::{Banner, Brand, Category, Order, OrderStatus, Product, Service, SessionUser};
use crate::pricing::PriceBreakdown;
use crate::storage::WriteOutcome;

#[derive(Debug, Deserialize)]
pub struct ProductParams { pub category: Option<String>, pub featured: Option<bool>, pub q: Option<String> }

pub async fn list_products(State(s): State<AppState>, Query(p): Query<ProductParams>) -> Json<Vec<Product>> {
    let mut products = match p.q.as_deref() {
        Some(q) => s.catalog.search(q).await,
        None => s.catalog.active_products().await,
    };
    if let Some(category) = p.category.as_deref() { products.retain(|x| x.category_id() == Some(category)); }
    if p.featured == Some(true) { products.retain(Product::is_featured); }
    Json(products)
}

pub async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    s.catalog.product(&id).await.filter(Product::is_active).map(Json).ok_or(ApiError::NotFound(format!("product {id}")))
}

pub async fn list_categories(State(s): State<AppState>) -> Json<Vec<Category>> { Json(s.catalog.categories().await) }
pub async fn list_brands(State(s): State<AppState>) -> Json<Vec<Brand>> { Json(s.catalog.brands().await) }
pub async fn list_services(State(s): State<AppState>) -> Json<Vec<Service>> { Json(s.catalog.services().await) }
pub async fn list_banners(State(s): State<AppState>) -> Json<Vec<Banner>> { Json(s.catalog.banners().await) }

pub async fn get_config(State(s): State<AppState>) -> Json<SiteConfig> { Json(s.config.load().await) }

#[derive(Debug, Serialize)]
pub struct ConfigResponse { pub config: SiteConfig, pub stored: WriteOutcome }

pub async fn put_config(RequireAdmin(admin): RequireAdmin, State(s): State<AppState>, Json(candidate): Json<Value>) -> Result<Json<ConfigResponse>> {
    let (config, stored) = s.config.save(&candidate).await?;
    info!(admin_id = %admin.id, ?stored, "site config saved");
    Ok(Json(ConfigResponse { config, stored }))
}

/// The signed-in user and promotion expiry the client keeps are sent along
/// with pricing requests; an unknown user id prices as a guest. The claimed
/// expiry is capped at the user's registration plus the promotion length.
async fn buyer(s: &AppState, user_id: Option<&str>, promotion_expires_at: Option<DateTime<Utc>>) -> Buyer {
    let user = match user_id {
        Some(id) => s.accounts.user(id).await,
        None => None,
    };
    match user {
        Some(user) => Buyer { promotion: s.accounts.promotion_for(&user, promotion_expires_at), user: Some(user.session()) },
        None => Buyer { user: None, promotion: None },
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub promotion_expires_at: Option<DateTime<Utc>>,
}

pub async fn quote(State(s): State<AppState>, Json(r): Json<QuoteRequest>) -> Result<Json<PriceBreakdown>> {
    let items = s.checkout.resolve_cart(&r.items).await?;
    let buyer = buyer(&s, r.user_id.as_deref(), r.promotion_expires_at).await;
    Ok(Json(s.checkout.quote(&items, r.payment_method.as_deref(), &buyer, Utc::now()).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub form: CheckoutForm,
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub promotion_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    pub reference: String,
    pub breakdown: PriceBreakdown,
    pub message: String,
    pub whatsapp_url: String,
    pub stored: WriteOutcome,
}

pub async fn checkout(State(s): State<AppState>, Json(r): Json<CheckoutRequest>) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let items = s.checkout.resolve_cart(&r.items).await?;
    let buyer = buyer(&s, r.user_id.as_deref(), r.promotion_expires_at).await;
    let placed = s.checkout.place_order(r.form, items, &buyer, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse {
        order_id: placed.order.id().to_string(), reference: placed.order.reference(), breakdown: placed.order.breakdown().clone(),
        message: placed.message, whatsapp_url: placed.whatsapp_url, stored: placed.stored,
    })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse { pub user: SessionUser, pub promotion_expires_at: DateTime<Utc> }

pub async fn register(State(s): State<AppState>, Json(form): Json<RegistrationForm>) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let reg = s.accounts.register(form).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user: reg.user, promotion_expires_at: reg.promotion.expires_at() })))
}

pub async fn login(State(s): State<AppState>, Json(form): Json<LoginForm>) -> Result<Json<SessionUser>> {
    Ok(Json(s.accounts.login(form).await?))
}

pub async fn list_orders(_: RequireAdmin, State(s): State<AppState>) -> Json<Vec<Order>> { Json(s.orders.list().await) }

pub async fn get_order(_: RequireAdmin, State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    Ok(Json(s.orders.get(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest { pub status: OrderStatus }

pub async fn set_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(r): Json<StatusRequest>,
) -> Result<Json<Order>> {
    let (order, stored) = s.orders.set_status(&id, r.status).await?;
    info!(admin_id = %admin.id, order_id = %id, status = ?r.status, ?stored, "order status set");
    Ok(Json(order))
}
