// Use case: create_webhook.

use crate::application::context::AppContext;
use crate::domain::value_objects::ids::WebhookId;
use metrics::counter;

/// Mints a new webhook and makes it immediately ready to accept captures.
pub struct CreateWebhookUseCase;

#[derive(Debug)]
pub enum CreateWebhookError {
    Storage(String),
}

#[derive(Debug, Clone)]
pub struct CreateWebhookResult {
    pub webhook_id: WebhookId,
}

impl CreateWebhookUseCase {
    /// Generate a fresh id and eagerly prepare both stores for it.
    pub async fn execute(ctx: &AppContext) -> Result<CreateWebhookResult, CreateWebhookError> {
        // Step 1: Mint a fresh webhook id.
        let webhook_id = WebhookId::new();

        // Step 2: Prepare the request store so captures can land right away.
        ctx.repos
            .request
            .prepare(webhook_id.as_str())
            .await
            .map_err(|e| CreateWebhookError::Storage(format!("{e:?}")))?;

        // Step 3: Prepare the response-rule store as well.
        ctx.repos
            .response_rule
            .prepare(webhook_id.as_str())
            .await
            .map_err(|e| CreateWebhookError::Storage(format!("{e:?}")))?;

        counter!("webhooks_created_total").increment(1);

        Ok(CreateWebhookResult { webhook_id })
    }
}
