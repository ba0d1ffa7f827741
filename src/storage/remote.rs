//! Remote document store.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{Collection, Result, StoreError};

/// The operations the storefront needs from its hosted database.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>>;
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>>;
    async fn upsert(&self, collection: Collection, id: &str, doc: &Value) -> Result<()>;
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}

/// PostgreSQL-backed store keeping every entity as a JSONB document.
#[derive(Clone)]
pub struct PgRemote {
    pool: PgPool,
}

impl PgRemote {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl RemoteStore for PgRemote {
    async fn list(&self, collection: Collection) -> Result<Vec<Value>> {
        let rows = sqlx::query_scalar::<_, Json<Value>>("SELECT body FROM documents WHERE collection = $1 ORDER BY created_at")
            .bind(collection.as_str()).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(v)| v).collect())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let row = sqlx::query_scalar::<_, Json<Value>>("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str()).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|Json(v)| v))
    }

    async fn upsert(&self, collection: Collection, id: &str, doc: &Value) -> Result<()> {
        sqlx::query("INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES ($1, $2, $3, NOW(), NOW()) ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()")
            .bind(collection.as_str()).bind(id).bind(Json(doc)).execute(&self.pool).await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str()).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

/// Stand-in used when no database is configured; every call fails so the
/// data layer runs entirely from the local mirror.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineRemote;

#[async_trait]
impl RemoteStore for OfflineRemote {
    async fn list(&self, _collection: Collection) -> Result<Vec<Value>> { Err(offline()) }
    async fn get(&self, _collection: Collection, _id: &str) -> Result<Option<Value>> { Err(offline()) }
    async fn upsert(&self, _collection: Collection, _id: &str, _doc: &Value) -> Result<()> { Err(offline()) }
    async fn delete(&self, _collection: Collection, _id: &str) -> Result<()> { Err(offline()) }
}

fn offline() -> StoreError { StoreError::Unavailable("no remote store configured".to_string()) }
