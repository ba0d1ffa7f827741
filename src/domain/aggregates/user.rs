//! Shopper and admin accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::value_objects::Email;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    /// Stored as entered; the shop's data store has always kept it this way.
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: Email, password: impl Into<String>) -> Self {
        Self { id: Uuid::now_v7().to_string(), name: name.into(), email, phone: None, password: password.into(), is_admin: false, created_at: Utc::now() }
    }

    /// Compares without short-circuiting on the first differing byte.
    pub fn password_matches(&self, candidate: &str) -> bool {
        let (a, b) = (self.password.as_bytes(), candidate.as_bytes());
        if a.len() != b.len() { return false; }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }

    /// The identity kept in client storage; never carries the password.
    pub fn session(&self) -> SessionUser {
        SessionUser { id: self.id.clone(), name: self.name.clone(), email: self.email.clone(), is_admin: self.is_admin }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub is_admin: bool,
}
