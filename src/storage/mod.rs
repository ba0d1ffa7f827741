//! Persistence: a remote document store with a local mirror behind it.
//!
//! Every read and write goes to the remote first. When the remote fails the
//! same operation runs against the local mirror instead. There is no retry
//! and no reconciliation between the two, so they may drift apart while the
//! remote is down.

pub mod fallback;
pub mod kv;
pub mod local;
#[cfg(test)]
mod memory;
pub mod remote;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::domain::aggregates::{Banner, Brand, Category, Order, Product, Service, User};

pub use fallback::{DataStore, Fetched, WriteOutcome};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use local::LocalMirror;
#[cfg(test)]
pub use memory::MemoryRemote;
pub use remote::{OfflineRemote, PgRemote, RemoteStore};

/// Named groups of documents, one per entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Products,
    Categories,
    Brands,
    Services,
    Banners,
    Orders,
    Users,
    Config,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Brands => "brands",
            Self::Services => "services",
            Self::Banners => "banners",
            Self::Orders => "orders",
            Self::Users => "users",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// An entity that lives in one collection under a string id.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    fn record_id(&self) -> &str;
}

macro_rules! record {
    ($ty:ty, $collection:expr, |$r:ident| $id:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;
            fn record_id(&self) -> &str { let $r = self; $id }
        }
    };
}

record!(Product, Collection::Products, |p| p.id());
record!(Order, Collection::Orders, |o| o.id());
record!(Category, Collection::Categories, |c| &c.id);
record!(Brand, Collection::Brands, |b| &b.id);
record!(Service, Collection::Services, |s| &s.id);
record!(Banner, Collection::Banners, |b| &b.id);
record!(User, Collection::Users, |u| &u.id);

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document has no id")]
    MissingId,

    #[error("Both stores failed: remote: {remote}; local: {local}")]
    BothFailed { remote: String, local: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Pulls the `id` field out of a stored document.
pub(crate) fn document_id(doc: &serde_json::Value) -> Option<&str> {
    doc.get("id").and_then(serde_json::Value::as_str)
}
