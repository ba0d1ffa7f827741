//! Switchable in-memory remote for tests of the fallback path.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, RemoteStore, Result, StoreError};

#[derive(Debug)]
pub struct MemoryRemote {
    online: AtomicBool,
    docs: Mutex<BTreeMap<(Collection, String), Value>>,
}

impl Default for MemoryRemote {
    fn default() -> Self { Self { online: AtomicBool::new(true), docs: Mutex::new(BTreeMap::new()) } }
}

impl MemoryRemote {
    pub fn new() -> Self { Self::default() }

    pub fn set_online(&self, online: bool) { self.online.store(online, Ordering::SeqCst); }

    /// Documents currently held, regardless of the online switch.
    pub fn snapshot(&self, collection: Collection) -> Vec<Value> {
        self.docs.lock().unwrap_or_else(|p| p.into_inner())
            .iter().filter(|((c, _), _)| *c == collection).map(|(_, v)| v.clone()).collect()
    }

    fn check(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) { Ok(()) }
        else { Err(StoreError::Unavailable("remote offline".to_string())) }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>> {
        self.check()?;
        Ok(self.snapshot(collection))
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        self.check()?;
        Ok(self.docs.lock().unwrap_or_else(|p| p.into_inner()).get(&(collection, id.to_string())).cloned())
    }

    async fn upsert(&self, collection: Collection, id: &str, doc: &Value) -> Result<()> {
        self.check()?;
        self.docs.lock().unwrap_or_else(|p| p.into_inner()).insert((collection, id.to_string()), doc.clone());
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.check()?;
        self.docs.lock().unwrap_or_else(|p| p.into_inner()).remove(&(collection, id.to_string()));
        Ok(())
    }
}
