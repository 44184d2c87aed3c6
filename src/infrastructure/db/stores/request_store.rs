use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::{RequestRow, RequestSummaryRow};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRepositoryError {
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for RequestRepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::InvalidIdentifier(_) => RequestRepositoryError::InvalidInput,
            _ => RequestRepositoryError::StorageUnavailable,
        }
    }
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Ensure the webhook's storage unit exists and its schema is current.
    /// Idempotent; safe to call before every other operation.
    async fn prepare(&self, webhook_id: &str) -> Result<(), RequestRepositoryError>;
    /// Upsert by id; a duplicate delivery replaces the prior record.
    async fn save(&self, row: &RequestRow) -> Result<(), RequestRepositoryError>;
    /// Summaries ordered by creation time, most recent first.
    async fn list(&self, webhook_id: &str)
        -> Result<Vec<RequestSummaryRow>, RequestRepositoryError>;
    /// Full record by id. Returns `None` if it doesn't exist.
    async fn find(
        &self,
        webhook_id: &str,
        request_id: &str,
    ) -> Result<Option<RequestRow>, RequestRepositoryError>;
    /// Total requests currently stored for the webhook.
    async fn count(&self, webhook_id: &str) -> Result<i64, RequestRepositoryError>;
    /// Whether a storage unit exists for this id. Never creates one.
    async fn exists(&self, webhook_id: &str) -> Result<bool, RequestRepositoryError>;
}
