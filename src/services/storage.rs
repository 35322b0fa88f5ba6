use crate::{
    models::{ListResult, Recommendation, SaveResult},
    services::document_store::{Document, DocumentStore, StoredDocument},
};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Persists recommendations and reads them back in transport shape.
///
/// Store failures never escape: they are reported through the `success` flag
/// and `error` message of the returned result.
#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn DocumentStore>,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, recommendation: &Recommendation) -> SaveResult {
        let body = match serde_json::to_value(recommendation) {
            Ok(Value::Object(body)) => body,
            Ok(other) => {
                return SaveResult::failed(format!("Expected a JSON object, got {}", other))
            }
            Err(e) => return SaveResult::failed(e.to_string()),
        };

        match self.store.insert_one(body, Utc::now()).await {
            Ok(id) => {
                info!("Saved recommendation '{}' as {}", recommendation.title, id);
                SaveResult::saved(id)
            }
            Err(e) => {
                error!("Failed to save recommendation: {}", e);
                SaveResult::failed(e.to_string())
            }
        }
    }

    pub async fn list_recent(&self, limit: usize) -> ListResult {
        match self.store.find_recent(limit).await {
            Ok(documents) => {
                ListResult::listed(documents.into_iter().take(limit).map(to_transport).collect())
            }
            Err(e) => {
                error!("Failed to list recommendations: {}", e);
                ListResult::failed(e.to_string())
            }
        }
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Exposes the store identifier as `id`, drops any internal `_id` field and
/// renders `created_at` as an RFC 3339 string.
fn to_transport(document: StoredDocument) -> Document {
    let StoredDocument {
        id,
        created_at,
        mut body,
    } = document;

    body.remove("_id");
    match created_at {
        Some(created_at) => {
            body.insert(
                "created_at".to_string(),
                Value::String(created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
        None => {
            body.remove("created_at");
        }
    }
    body.insert("id".to_string(), Value::String(id));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ApiError, Result},
        models::MovieDetail,
        services::document_store::InMemoryDocumentStore,
    };
    use async_trait::async_trait;
    use chrono::DateTime;
    use serde_json::json;

    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn insert_one(&self, _body: Document, _created_at: DateTime<Utc>) -> Result<String> {
            Err(ApiError::Database("connection reset".to_string()))
        }

        async fn find_recent(&self, _limit: usize) -> Result<Vec<StoredDocument>> {
            Err(ApiError::Database("connection reset".to_string()))
        }
    }

    fn recommendation(title: &str) -> Recommendation {
        Recommendation::from(MovieDetail {
            title: Some(title.to_string()),
            ..MovieDetail::default()
        })
    }

    #[tokio::test]
    async fn test_save_leaves_input_untouched() {
        let gateway = StorageGateway::new(Arc::new(InMemoryDocumentStore::new()));
        let original = recommendation("Heat");
        let snapshot = original.clone();

        let result = gateway.save(&original).await;

        assert!(result.success);
        assert!(result.id.is_some());
        assert_eq!(original, snapshot);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let gateway = StorageGateway::new(Arc::new(BrokenStore));

        let result = gateway.save(&recommendation("Heat")).await;

        assert!(!result.success);
        assert_eq!(result.id, None);
        assert!(result.error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_list_recent_shape_and_order() {
        let gateway = StorageGateway::new(Arc::new(InMemoryDocumentStore::new()));
        for title in ["Alien", "Brazil", "Clue"] {
            assert!(gateway.save(&recommendation(title)).await.success);
        }

        let result = gateway.list_recent(2).await;

        assert!(result.success);
        let entries = result.recommendations.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["title"], "Clue");
        assert_eq!(entries[1]["title"], "Brazil");
        for entry in &entries {
            assert!(entry["id"].is_string());
            assert!(!entry.contains_key("_id"));
            let created_at = entry["created_at"].as_str().unwrap();
            assert!(DateTime::parse_from_rfc3339(created_at).is_ok());
        }
    }

    #[tokio::test]
    async fn test_list_failure_is_reported() {
        let gateway = StorageGateway::new(Arc::new(BrokenStore));

        let result = gateway.list_recent(DEFAULT_LIST_LIMIT).await;

        assert!(!result.success);
        assert!(result.recommendations.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn test_transport_strips_internal_id() {
        let mut body = Document::new();
        body.insert("_id".to_string(), json!({"$oid": "64b7f0c2e1"}));
        body.insert("title".to_string(), json!("Heat"));
        let document = StoredDocument {
            id: "64b7f0c2e1".to_string(),
            created_at: None,
            body,
        };

        let entry = to_transport(document);

        assert_eq!(entry["id"], "64b7f0c2e1");
        assert!(!entry.contains_key("_id"));
        assert!(!entry.contains_key("created_at"));
    }
}
