// Use case: list_requests.

use crate::application::context::AppContext;
use crate::domain::entities::captured_request::RequestSummary;

/// Lists a webhook's captured requests, most recent first.
pub struct ListRequestsUseCase;

#[derive(Debug)]
pub enum ListRequestsError {
    Storage(String),
}

impl ListRequestsUseCase {
    pub async fn execute(
        ctx: &AppContext,
        webhook_id: &str,
    ) -> Result<Vec<RequestSummary>, ListRequestsError> {
        // Step 1: Make sure the storage unit and schema exist.
        ctx.repos
            .request
            .prepare(webhook_id)
            .await
            .map_err(|e| ListRequestsError::Storage(format!("{e:?}")))?;

        // Step 2: Delegate to the store.
        ctx.repos
            .request
            .list(webhook_id)
            .await
            .map_err(|e| ListRequestsError::Storage(format!("{e:?}")))
    }
}
