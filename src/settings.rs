//! Process settings loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8083)
//! - `DATABASE_URL` - `PostgreSQL` connection string. When unset the
//!   service runs on the local mirror alone.
//! - `LOCAL_STORE_PATH` - File backing the local mirror (default: ./data/local-store.json)
//! - `SHIPPING_COST` - Flat shipping charge added to every total (default: 0)
//! - `PROMO_WINDOW_HOURS` - Length of the welcome promotion (default: 24)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Back-office account ensured at startup.
//!   Set both or neither.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::promo::DEFAULT_WINDOW_HOURS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: Option<String>,
    pub local_store_path: PathBuf,
    pub shipping_cost: Decimal,
    pub promo_window_hours: i64,
    pub admin: Option<AdminSeed>,
}

/// Credentials for the back-office account created at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("local_store_path", &self.local_store_path)
            .field("shipping_cost", &self.shipping_cost)
            .field("promo_window_hours", &self.promo_window_hours)
            .field("admin_email", &self.admin.as_ref().map(|a| a.email.as_str()))
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let shipping_cost: Decimal = parse_or(&get, "SHIPPING_COST", Decimal::ZERO)?;
        if shipping_cost < Decimal::ZERO {
            return Err(SettingsError::InvalidEnvVar("SHIPPING_COST".into(), "must not be negative".into()));
        }
        let promo_window_hours: i64 = parse_or(&get, "PROMO_WINDOW_HOURS", DEFAULT_WINDOW_HOURS)?;
        if promo_window_hours <= 0 {
            return Err(SettingsError::InvalidEnvVar("PROMO_WINDOW_HOURS".into(), "must be positive".into()));
        }

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(SettingsError::InvalidEnvVar("ADMIN_PASSWORD".into(), "required with ADMIN_EMAIL".into())),
            (None, Some(_)) => return Err(SettingsError::InvalidEnvVar("ADMIN_EMAIL".into(), "required with ADMIN_PASSWORD".into())),
        };

        Ok(Self {
            host: parse_or(&get, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&get, "PORT", 8083)?,
            database_url: get("DATABASE_URL"),
            local_store_path: get("LOCAL_STORE_PATH").map_or_else(|| PathBuf::from("./data/local-store.json"), PathBuf::from),
            shipping_cost,
            promo_window_hours,
            admin,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }

    pub fn promo_length(&self) -> chrono::Duration { chrono::Duration::hours(self.promo_window_hours) }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| SettingsError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
