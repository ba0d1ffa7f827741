//! HTTP error mapping. Every handler returns `Result<T, ApiError>`.

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::accounts::AuthError;
use crate::checkout::CheckoutError;
use crate::domain::aggregates::OrderError;
use crate::forms::FieldError;
use crate::orders::OrdersError;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Order error: {0}")]
    Orders(#[from] OrdersError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::Invalid(_)) | Self::Checkout(CheckoutError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(AuthError::AlreadyRegistered) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Checkout(CheckoutError::Pricing(_) | CheckoutError::Order(OrderError::NoItems))
            | Self::Orders(OrdersError::Order(OrderError::NoItems)) => StatusCode::BAD_REQUEST,
            Self::Checkout(CheckoutError::Order(OrderError::NotFound(_)))
            | Self::Orders(OrdersError::Order(OrderError::NotFound(_)))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Checkout(CheckoutError::NoWhatsappNumber) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Auth(AuthError::Store(_))
            | Self::Checkout(CheckoutError::Store(_))
            | Self::Orders(OrdersError::Store(_) | OrdersError::StockNotCommitted { .. })
            | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the shopper sees. Storage details stay in the logs.
    fn message(&self) -> String {
        match self {
            Self::Auth(AuthError::Invalid(_)) | Self::Checkout(CheckoutError::Invalid(_)) => "Please correct the highlighted fields".to_string(),
            Self::Auth(AuthError::AlreadyRegistered) => "An account with this email already exists".to_string(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Checkout(CheckoutError::Order(OrderError::NoItems)) => "Your cart is empty".to_string(),
            Self::Checkout(CheckoutError::Pricing(e)) => e.to_string(),
            Self::Checkout(CheckoutError::NoWhatsappNumber) => "The shop is not taking orders right now".to_string(),
            Self::Checkout(CheckoutError::Order(e)) | Self::Orders(OrdersError::Order(e)) => e.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized => "Sign in with an admin account".to_string(),
            Self::Forbidden => "Admin access required".to_string(),
            Self::Orders(OrdersError::StockNotCommitted { .. }) => "Order updated, but stock could not be adjusted".to_string(),
            Self::Auth(AuthError::Store(_)) | Self::Checkout(CheckoutError::Store(_)) | Self::Orders(OrdersError::Store(_)) | Self::Store(_) => {
                "Internal server error".to_string()
            }
        }
    }

    fn fields(&self) -> Option<&[FieldError]> {
        match self {
            Self::Auth(AuthError::Invalid(fields)) | Self::Checkout(CheckoutError::Invalid(fields)) => Some(fields),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = match self.fields() {
            Some(fields) => json!({ "error": self.message(), "fields": fields }),
            None => json!({ "error": self.message() }),
        };
        if matches!(self, Self::Unauthorized) {
            return (status, [(WWW_AUTHENTICATE, "Basic realm=\"voltio-admin\"")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(AuthError::AlreadyRegistered).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(CheckoutError::Invalid(vec![])).status(), StatusCode::UNPROCESSABLE_ENTITY);
        let pricing = CheckoutError::Pricing(PricingError::InvalidQuantity { product_id: "p".into(), quantity: 0 });
        assert_eq!(ApiError::from(pricing).status(), StatusCode::BAD_REQUEST);
        let missing = OrdersError::Order(OrderError::NotFound("x".into()));
        assert_eq!(ApiError::from(missing).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthorized_asks_for_basic_credentials() {
        let res = ApiError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().get(WWW_AUTHENTICATE).is_some_and(|v| v.as_bytes().starts_with(b"Basic")));
        assert!(ApiError::from(AuthError::InvalidCredentials).into_response().headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_partial_stock_commit_is_server_error() {
        let err = ApiError::from(OrdersError::StockNotCommitted { order_id: "o1".into(), product_ids: vec!["p1".into()] });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("p1"));
    }

    #[test]
    fn test_store_details_not_exposed() {
        let err = ApiError::from(StoreError::Unavailable("db at 10.0.0.5 refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("10.0.0.5"));
    }
}
