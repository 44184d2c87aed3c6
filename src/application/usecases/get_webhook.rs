// Use case: get_webhook.

use crate::application::context::AppContext;
use crate::domain::entities::response_rule::ResponseRule;
use crate::domain::value_objects::ids::WebhookId;

/// Fetches a webhook's current response-rule set.
pub struct GetWebhookUseCase;

#[derive(Debug)]
pub enum GetWebhookError {
    Storage(String),
}

#[derive(Debug, Clone)]
pub struct GetWebhookResult {
    pub webhook_id: WebhookId,
    pub responses: Vec<ResponseRule>,
}

impl GetWebhookUseCase {
    pub async fn execute(
        ctx: &AppContext,
        webhook_id: &str,
    ) -> Result<GetWebhookResult, GetWebhookError> {
        // Step 1: Make sure the storage unit and schema exist.
        ctx.repos
            .response_rule
            .prepare(webhook_id)
            .await
            .map_err(|e| GetWebhookError::Storage(format!("{e:?}")))?;

        // Step 2: Load the ordered rule list.
        let responses = ctx
            .repos
            .response_rule
            .list(webhook_id)
            .await
            .map_err(|e| GetWebhookError::Storage(format!("{e:?}")))?;

        Ok(GetWebhookResult {
            webhook_id: WebhookId::from(webhook_id),
            responses,
        })
    }
}
