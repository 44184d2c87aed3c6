use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::ResponseRuleRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseRuleRepositoryError {
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for ResponseRuleRepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::InvalidIdentifier(_) => ResponseRuleRepositoryError::InvalidInput,
            _ => ResponseRuleRepositoryError::StorageUnavailable,
        }
    }
}

#[async_trait]
pub trait ResponseRuleStore: Send + Sync {
    /// Ensure the webhook's storage unit exists and its schema is current.
    async fn prepare(&self, webhook_id: &str) -> Result<(), ResponseRuleRepositoryError>;
    /// All rules for the webhook ordered by position ascending.
    async fn list(&self, webhook_id: &str)
        -> Result<Vec<ResponseRuleRow>, ResponseRuleRepositoryError>;
    /// Replace the whole rule list in one transaction; readers never observe
    /// a partial set.
    async fn replace_all(
        &self,
        webhook_id: &str,
        rows: &[ResponseRuleRow],
    ) -> Result<(), ResponseRuleRepositoryError>;
}
