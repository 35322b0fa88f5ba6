use crate::error::{ApiError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    types::Json,
};
use std::sync::RwLock;
use uuid::Uuid;

pub type Document = Map<String, Value>;

/// A document as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Identifier assigned by the store on insert.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub body: Document,
}

/// One schemaless collection supporting insert and newest-first listing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and returns the identifier the store assigned.
    async fn insert_one(&self, body: Document, created_at: DateTime<Utc>) -> Result<String>;

    /// Returns up to `limit` documents, newest `created_at` first.
    async fn find_recent(&self, limit: usize) -> Result<Vec<StoredDocument>>;

    async fn close(&self) {}
}

const COLLECTION: &str = "recommendations";

/// PostgreSQL-backed collection: a JSONB document column keyed by UUID.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        let store = Self { pool };
        store.ensure_collection().await?;
        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {COLLECTION} (
                id UUID PRIMARY KEY,
                document JSONB NOT NULL,
                created_at TIMESTAMPTZ
            )"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {COLLECTION}_created_at_idx \
             ON {COLLECTION} (created_at DESC)"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert_one(&self, body: Document, created_at: DateTime<Utc>) -> Result<String> {
        let id = Uuid::new_v4();

        sqlx::query(&format!(
            "INSERT INTO {COLLECTION} (id, document, created_at) VALUES ($1, $2, $3)"
        ))
        .bind(id)
        .bind(Json(body))
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(id.to_string())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<StoredDocument>> {
        let limit = i64::try_from(limit)
            .map_err(|_| ApiError::Database(format!("Invalid limit: {}", limit)))?;

        let rows: Vec<(Uuid, Json<Document>, Option<DateTime<Utc>>)> = sqlx::query_as(&format!(
            "SELECT id, document, created_at FROM {COLLECTION} \
             ORDER BY created_at DESC NULLS LAST LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body), created_at)| StoredDocument {
                id: id.to_string(),
                created_at,
                body,
            })
            .collect())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Process-local collection backing the test suites.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, body: Document, created_at: DateTime<Utc>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut documents = self
            .documents
            .write()
            .map_err(|e| ApiError::Database(e.to_string()))?;

        documents.push(StoredDocument {
            id: id.clone(),
            created_at: Some(created_at),
            body,
        });
        Ok(id)
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<StoredDocument>> {
        let documents = self
            .documents
            .read()
            .map_err(|e| ApiError::Database(e.to_string()))?;

        let mut recent = documents.clone();
        // Stable sort keeps insertion order for equal timestamps; reverse puts the
        // latest insert first among ties.
        recent.reverse();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }
}
