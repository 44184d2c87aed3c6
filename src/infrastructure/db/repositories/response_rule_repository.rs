use crate::domain::entities::response_rule::ResponseRule;
use crate::infrastructure::db::dto::ResponseRuleRow;
use crate::infrastructure::db::stores::response_rule_store::{
    ResponseRuleRepositoryError, ResponseRuleStore,
};
use std::sync::Arc;

/// Entity-level access to a webhook's ordered response-rule list.
pub struct ResponseRuleRepository {
    store: Arc<dyn ResponseRuleStore>,
}

impl ResponseRuleRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn ResponseRuleStore>) -> Self {
        Self { store }
    }

    /// Ensure the webhook's storage unit and schema exist.
    pub async fn prepare(&self, webhook_id: &str) -> Result<(), ResponseRuleRepositoryError> {
        self.store.prepare(webhook_id).await
    }

    /// Rules for the webhook ordered by position ascending.
    pub async fn list(
        &self,
        webhook_id: &str,
    ) -> Result<Vec<ResponseRule>, ResponseRuleRepositoryError> {
        let rows = self.store.list(webhook_id).await?;
        Ok(rows.into_iter().map(|row| row.into_entity()).collect())
    }

    /// Atomically swap the webhook's rule list for the given one.
    pub async fn replace_all(
        &self,
        webhook_id: &str,
        rules: &[ResponseRule],
    ) -> Result<(), ResponseRuleRepositoryError> {
        let rows: Vec<ResponseRuleRow> = rules.iter().map(ResponseRuleRow::from_entity).collect();
        self.store.replace_all(webhook_id, &rows).await
    }
}
