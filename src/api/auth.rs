//! Back-office access. Admin routes take HTTP Basic credentials on every
//! request and check them against the account store.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::warn;

use super::error::ApiError;
use super::AppState;
use crate::accounts::{AuthError, LoginForm};
use crate::domain::aggregates::SessionUser;

/// Extractor that requires a signed-in admin.
///
/// Missing or wrong credentials are rejected with 401, a valid non-admin
/// account with 403.
pub struct RequireAdmin(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (email, password) = basic_credentials(parts).ok_or(ApiError::Unauthorized)?;
        let user = state.accounts.login(LoginForm { email, password }).await.map_err(|e| match e {
            AuthError::InvalidCredentials => ApiError::Unauthorized,
            other => other.into(),
        })?;
        if !user.is_admin {
            warn!(user_id = %user.id, path = %parts.uri.path(), "back-office request from non-admin");
            return Err(ApiError::Forbidden);
        }
        Ok(Self(user))
    }
}

fn basic_credentials(parts: &Parts) -> Option<(String, String)> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}
