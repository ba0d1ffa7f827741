//! Shopper registration and sign-in.
//!
//! An unknown email and a wrong password produce the same sign-in error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::domain::aggregates::{SessionUser, User};
use crate::domain::value_objects::Email;
use crate::forms::{field_errors, validate_phone, FieldError};
use crate::promo::{PromotionalWindow, DEFAULT_WINDOW_HOURS};
use crate::session::ClientState;
use crate::storage::{DataStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Invalid(Vec<FieldError>),

    #[error("email already registered")]
    AlreadyRegistered,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "Enter your name"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Use at least 6 characters"))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// A new account together with the welcome promotion it opened.
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    pub user: SessionUser,
    pub promotion: PromotionalWindow,
}

impl Registration {
    /// Signs the new shopper in and stores their promotion expiry.
    pub fn remember(&self, state: &ClientState) -> Result<(), StoreError> {
        state.set_current_user(&self.user)?;
        state.set_promo_window(&self.promotion)
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: DataStore,
    promo_length: chrono::Duration,
}

impl AccountService {
    pub fn new(store: DataStore) -> Self { Self { store, promo_length: chrono::Duration::hours(DEFAULT_WINDOW_HOURS) } }

    pub fn with_promo_length(mut self, length: chrono::Duration) -> Self { self.promo_length = length; self }

    pub async fn user(&self, id: &str) -> Option<User> { self.store.get::<User>(id).await }

    pub async fn find_by_email(&self, email: &Email) -> Option<User> {
        self.store.list::<User>().await.into_iter().find(|u| &u.email == email)
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<Registration, AuthError> {
        form.validate().map_err(|e| AuthError::Invalid(field_errors(&e)))?;
        let email = Email::parse(&form.email)
            .map_err(|_| AuthError::Invalid(vec![FieldError::new("email", "Enter a valid email address")]))?;

        if self.find_by_email(&email).await.is_some() {
            return Err(AuthError::AlreadyRegistered);
        }

        let mut user = User::new(form.name.trim(), email, form.password);
        user.phone = form.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        self.store.save(&user).await?;
        info!(user_id = %user.id, "shopper registered");

        Ok(Registration { user: user.session(), promotion: PromotionalWindow::starting_at(Utc::now(), self.promo_length) })
    }

    /// The promotion a signed-in user may use. The client keeps the expiry,
    /// but it never runs past registration plus the promotion length.
    pub fn promotion_for(&self, user: &User, claimed: Option<DateTime<Utc>>) -> Option<PromotionalWindow> {
        let earned = user.created_at + self.promo_length;
        claimed.map(|expires_at| PromotionalWindow::new(expires_at.min(earned)))
    }

    /// Creates the back-office account, or promotes and re-keys an existing
    /// one with the same email.
    pub async fn ensure_admin(&self, name: &str, email: &Email, password: &str) -> Result<SessionUser, AuthError> {
        let user = match self.find_by_email(email).await {
            Some(mut user) => {
                user.is_admin = true;
                user.password = password.to_string();
                user
            }
            None => {
                let mut user = User::new(name, email.clone(), password);
                user.is_admin = true;
                user
            }
        };
        self.store.save(&user).await?;
        info!(user_id = %user.id, "admin account ready");
        Ok(user.session())
    }

    pub async fn login(&self, form: LoginForm) -> Result<SessionUser, AuthError> {
        let email = Email::parse(&form.email).map_err(|_| AuthError::InvalidCredentials)?;
        match self.find_by_email(&email).await {
            Some(user) if user.password_matches(&form.password) => Ok(user.session()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
