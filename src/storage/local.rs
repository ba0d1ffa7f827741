//! Local mirror of the remote collections.
//!
//! Each collection is kept as one JSON array under its own key, the way the
//! storefront has always cached entities in local storage.

use std::sync::Arc;

use serde_json::Value;

use super::kv::{read_json, write_json, KeyValueStore};
use super::{document_id, Collection, Result, StoreError};

#[derive(Clone)]
pub struct LocalMirror {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalMirror {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self { Self { kv } }

    fn key(collection: Collection) -> String { format!("mirror:{collection}") }

    pub fn list(&self, collection: Collection) -> Result<Vec<Value>> {
        Ok(read_json::<Vec<Value>>(self.kv.as_ref(), &Self::key(collection))?.unwrap_or_default())
    }

    pub fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        Ok(self.list(collection)?.into_iter().find(|doc| document_id(doc) == Some(id)))
    }

    /// Replaces the document with the same id, or appends it.
    pub fn upsert(&self, collection: Collection, doc: &Value) -> Result<()> {
        let id = document_id(doc).ok_or(StoreError::MissingId)?;
        let mut docs = self.list(collection)?;
        match docs.iter_mut().find(|d| document_id(d) == Some(id)) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        write_json(self.kv.as_ref(), &Self::key(collection), &docs)
    }

    /// Returns whether anything was removed.
    pub fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let mut docs = self.list(collection)?;
        let before = docs.len();
        docs.retain(|d| document_id(d) != Some(id));
        if docs.len() == before { return Ok(false); }
        write_json(self.kv.as_ref(), &Self::key(collection), &docs)?;
        Ok(true)
    }
}
