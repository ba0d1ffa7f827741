//! Remote-first data access that degrades to the local mirror.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::local::LocalMirror;
use super::remote::RemoteStore;
use super::{document_id, Collection, Record, Result, StoreError};

/// Which store accepted a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Remote,
    /// The remote failed; only the local mirror has this change.
    Local,
}

/// Result of looking a single document up.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched {
    Found(Value),
    Missing,
    /// Something is stored but could not be read back.
    Unreadable,
}

#[derive(Clone)]
pub struct DataStore {
    remote: Arc<dyn RemoteStore>,
    local: LocalMirror,
}

impl DataStore {
    pub fn new(remote: Arc<dyn RemoteStore>, local: LocalMirror) -> Self { Self { remote, local } }

    pub fn local(&self) -> &LocalMirror { &self.local }

    /// Never fails: a double failure reads as an empty collection.
    pub async fn list_raw(&self, collection: Collection) -> Vec<Value> {
        match self.remote.list(collection).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(%collection, error = %e, "remote list failed, reading local mirror");
                self.local.list(collection).unwrap_or_else(|e| {
                    warn!(%collection, error = %e, "local mirror unreadable");
                    Vec::new()
                })
            }
        }
    }

    pub async fn fetch_raw(&self, collection: Collection, id: &str) -> Fetched {
        match self.remote.get(collection, id).await {
            Ok(Some(doc)) => Fetched::Found(doc),
            Ok(None) => Fetched::Missing,
            Err(e) => {
                warn!(%collection, id, error = %e, "remote get failed, reading local mirror");
                match self.local.get(collection, id) {
                    Ok(Some(doc)) => Fetched::Found(doc),
                    Ok(None) => Fetched::Missing,
                    Err(e) => {
                        warn!(%collection, id, error = %e, "local mirror unreadable");
                        Fetched::Unreadable
                    }
                }
            }
        }
    }

    pub async fn save_raw(&self, collection: Collection, doc: &Value) -> Result<WriteOutcome> {
        let id = document_id(doc).ok_or(StoreError::MissingId)?;
        match self.remote.upsert(collection, id, doc).await {
            Ok(()) => {
                debug!(%collection, id, "saved to remote");
                Ok(WriteOutcome::Remote)
            }
            Err(remote) => {
                warn!(%collection, id, error = %remote, "remote save failed, writing local mirror");
                self.local.upsert(collection, doc)
                    .map(|()| WriteOutcome::Local)
                    .map_err(|local| StoreError::BothFailed { remote: remote.to_string(), local: local.to_string() })
            }
        }
    }

    pub async fn delete_raw(&self, collection: Collection, id: &str) -> Result<WriteOutcome> {
        match self.remote.delete(collection, id).await {
            Ok(()) => Ok(WriteOutcome::Remote),
            Err(remote) => {
                warn!(%collection, id, error = %remote, "remote delete failed, deleting from local mirror");
                self.local.delete(collection, id)
                    .map(|_| WriteOutcome::Local)
                    .map_err(|local| StoreError::BothFailed { remote: remote.to_string(), local: local.to_string() })
            }
        }
    }

    /// Documents that do not decode as `T` are logged and skipped.
    pub async fn list<T: Record>(&self) -> Vec<T> {
        self.list_raw(T::COLLECTION).await.into_iter()
            .filter_map(|doc| match serde_json::from_value::<T>(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection = %T::COLLECTION, error = %e, "skipping malformed document");
                    None
                }
            })
            .collect()
    }

    pub async fn get<T: Record>(&self, id: &str) -> Option<T> {
        match self.fetch_raw(T::COLLECTION, id).await {
            Fetched::Found(doc) => serde_json::from_value(doc)
                .map_err(|e| warn!(collection = %T::COLLECTION, id, error = %e, "malformed document"))
                .ok(),
            Fetched::Missing | Fetched::Unreadable => None,
        }
    }

    pub async fn save<T: Record>(&self, record: &T) -> Result<WriteOutcome> {
        let doc = serde_json::to_value(record)?;
        self.save_raw(T::COLLECTION, &doc).await
    }

    pub async fn delete<T: Record>(&self, id: &str) -> Result<WriteOutcome> {
        self.delete_raw(T::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Brand, Category};
    use crate::storage::{KeyValueStore, MemoryRemote, MemoryStore, OfflineRemote};
    use serde_json::json;

    fn store(remote: Arc<MemoryRemote>) -> DataStore {
        DataStore::new(remote, LocalMirror::new(Arc::new(MemoryStore::new())))
    }

    struct BrokenStore;
    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> { Err(std::io::Error::other("disk gone").into()) }
        fn set(&self, _key: &str, _value: &str) -> Result<()> { Err(std::io::Error::other("disk gone").into()) }
        fn remove(&self, _key: &str) -> Result<()> { Err(std::io::Error::other("disk gone").into()) }
    }

    #[tokio::test]
    async fn test_online_write_skips_mirror() {
        let remote = Arc::new(MemoryRemote::new());
        let ds = store(remote.clone());
        let brand = Brand::new("Siemens");
        assert_eq!(ds.save(&brand).await.unwrap(), WriteOutcome::Remote);
        assert_eq!(remote.snapshot(Collection::Brands).len(), 1);
        assert!(ds.local().list(Collection::Brands).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline_write_and_read_use_mirror() {
        let remote = Arc::new(MemoryRemote::new());
        remote.set_online(false);
        let ds = store(remote.clone());
        let cat = Category::new("Lighting");
        assert_eq!(ds.save(&cat).await.unwrap(), WriteOutcome::Local);
        assert_eq!(ds.list::<Category>().await, vec![cat.clone()]);
        assert_eq!(ds.get::<Category>(&cat.id).await, Some(cat));
        assert!(remote.snapshot(Collection::Categories).is_empty());
    }

    #[tokio::test]
    async fn test_repeated_fallback_writes_are_idempotent() {
        let ds = DataStore::new(Arc::new(OfflineRemote), LocalMirror::new(Arc::new(MemoryStore::new())));
        let mut brand = Brand::new("Schneider");
        for _ in 0..3 { ds.save(&brand).await.unwrap(); }
        brand.logo_url = Some("logo.png".into());
        ds.save(&brand).await.unwrap();
        let brands = ds.list::<Brand>().await;
        assert_eq!(brands, vec![brand]);
    }

    #[tokio::test]
    async fn test_divergence_is_stable_when_remote_returns() {
        let remote = Arc::new(MemoryRemote::new());
        let ds = store(remote.clone());
        ds.save(&Brand::new("Online")).await.unwrap();
        remote.set_online(false);
        ds.save(&Brand::new("Offline")).await.unwrap();
        remote.set_online(true);
        // The remote never learns about the offline write; the mirror keeps it.
        let names: Vec<_> = ds.list::<Brand>().await.into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Online".to_string()]);
        assert_eq!(ds.local().list(Collection::Brands).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_on_remote_does_not_consult_mirror() {
        let remote = Arc::new(MemoryRemote::new());
        let ds = store(remote);
        ds.local().upsert(Collection::Brands, &json!({"id": "b1", "name": "Stale"})).unwrap();
        assert_eq!(ds.fetch_raw(Collection::Brands, "b1").await, Fetched::Missing);
    }

    #[tokio::test]
    async fn test_reads_never_fail() {
        let ds = DataStore::new(Arc::new(OfflineRemote), LocalMirror::new(Arc::new(BrokenStore)));
        assert!(ds.list::<Brand>().await.is_empty());
        assert_eq!(ds.fetch_raw(Collection::Brands, "x").await, Fetched::Unreadable);
        assert!(matches!(ds.save(&Brand::new("X")).await, Err(StoreError::BothFailed { .. })));
    }

    #[tokio::test]
    async fn test_malformed_documents_skipped() {
        let ds = DataStore::new(Arc::new(OfflineRemote), LocalMirror::new(Arc::new(MemoryStore::new())));
        ds.local().upsert(Collection::Brands, &json!({"id": "bad"})).unwrap();
        ds.save(&Brand::new("Good")).await.unwrap();
        assert_eq!(ds.list::<Brand>().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_falls_back() {
        let ds = DataStore::new(Arc::new(OfflineRemote), LocalMirror::new(Arc::new(MemoryStore::new())));
        let brand = Brand::new("Gone");
        ds.save(&brand).await.unwrap();
        assert_eq!(ds.delete::<Brand>(&brand.id).await.unwrap(), WriteOutcome::Local);
        assert!(ds.list::<Brand>().await.is_empty());
    }
}
