use crate::domain::entities::captured_request::{CapturedRequest, RequestSummary};
use crate::infrastructure::db::dto::RequestRow;
use crate::infrastructure::db::stores::request_store::{RequestRepositoryError, RequestStore};
use std::sync::Arc;

/// Entity-level access to captured requests, backed by a store
/// implementation.
pub struct RequestRepository {
    store: Arc<dyn RequestStore>,
}

impl RequestRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }

    /// Ensure the webhook's storage unit and schema exist.
    pub async fn prepare(&self, webhook_id: &str) -> Result<(), RequestRepositoryError> {
        self.store.prepare(webhook_id).await
    }

    /// Persist a captured request; saving the same id twice keeps the later
    /// write.
    pub async fn save(&self, request: &CapturedRequest) -> Result<(), RequestRepositoryError> {
        self.store.save(&RequestRow::from_entity(request)).await
    }

    /// Summaries for the webhook, most recent first.
    pub async fn list(&self, webhook_id: &str) -> Result<Vec<RequestSummary>, RequestRepositoryError> {
        let rows = self.store.list(webhook_id).await?;
        Ok(rows.into_iter().map(|row| row.into_entity()).collect())
    }

    /// Full record by id. Returns `None` if it doesn't exist.
    pub async fn find(
        &self,
        webhook_id: &str,
        request_id: &str,
    ) -> Result<Option<CapturedRequest>, RequestRepositoryError> {
        let row = self.store.find(webhook_id, request_id).await?;
        Ok(row.map(|row| row.into_entity()))
    }

    /// Total requests currently stored for the webhook.
    pub async fn count(&self, webhook_id: &str) -> Result<i64, RequestRepositoryError> {
        self.store.count(webhook_id).await
    }

    /// Whether a storage unit exists for this id. Never creates one.
    pub async fn exists(&self, webhook_id: &str) -> Result<bool, RequestRepositoryError> {
        self.store.exists(webhook_id).await
    }
}
