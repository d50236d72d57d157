//! Postgres-backed document store.
//!
//! Every collection lives in one `documents` table; payloads are stored as
//! JSONB so partial updates can use the native `||` (shallow merge) operator.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (any code) | `Database` |
//! | PoolClosed / PoolTimedOut / Io | `Unavailable` |
//! | ColumnDecode / Decode | `Serialization` |
//! | Other | `Database` |

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use songparts_core::{Part, PartFields, PartId};

use super::r#trait::{DocumentStore, StoreError, StoreResult};

/// Postgres-backed document store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool which is thread-safe (Arc + Send + Sync).
/// Each operation is a single statement; no multi-statement transactions.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    /// Create a store over an existing pool. Call [`Self::ensure_schema`] once
    /// before use if the table may not exist yet.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `url` and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `documents` table and its listing index if missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS documents_collection_created_idx
                ON documents (collection, created_at, id)
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, fields), fields(field_count = fields.len()), err)]
    async fn add(&self, collection: &str, fields: PartFields) -> StoreResult<PartId> {
        let id = PartId::generate();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Json(fields.into_map()))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("add", e))?;

        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, collection: &str) -> StoreResult<Vec<Part>> {
        let rows = sqlx::query(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(row_to_part).collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn get(&self, collection: &str, id: &PartId) -> StoreResult<Option<Part>> {
        let row = sqlx::query(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(row_to_part).transpose()
    }

    #[instrument(skip(self, patch), fields(id = %id, field_count = patch.len()), err)]
    async fn update(&self, collection: &str, id: &PartId, patch: PartFields) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Json(patch.into_map()))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, collection: &str, id: &PartId) -> StoreResult<()> {
        sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(())
    }
}

fn row_to_part(row: &PgRow) -> StoreResult<Part> {
    let id: String = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode id", e))?;
    let Json(data): Json<Map<String, JsonValue>> = row
        .try_get("data")
        .map_err(|e| map_sqlx_error("decode data", e))?;

    let id = PartId::parse(&id).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(Part::new(id, PartFields::from(data)))
}

/// Map SQLx errors to store errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Database(format!(
            "database error in {}: {} (code {})",
            operation,
            db_err.message(),
            db_err.code().as_deref().unwrap_or("none")
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(format!("decode error in {}: {}", operation, err))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
