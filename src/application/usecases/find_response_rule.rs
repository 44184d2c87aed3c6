// Use case: find_response_rule.

use crate::application::context::AppContext;
use crate::domain::entities::response_rule::ResponseRule;
use crate::domain::services::rule_matching;

/// Finds the first stored rule matching an inbound capture, if any.
pub struct FindResponseRuleUseCase;

#[derive(Debug)]
pub enum FindResponseRuleError {
    Storage(String),
}

impl FindResponseRuleUseCase {
    /// First rule in position order matching the (normalized) method and
    /// sub-path. `None` means the caller falls back to the generic
    /// acknowledgement.
    pub async fn execute(
        ctx: &AppContext,
        webhook_id: &str,
        method: &str,
        sub_path: &str,
    ) -> Result<Option<ResponseRule>, FindResponseRuleError> {
        // Step 1: Make sure the storage unit and schema exist.
        ctx.repos
            .response_rule
            .prepare(webhook_id)
            .await
            .map_err(|e| FindResponseRuleError::Storage(format!("{e:?}")))?;

        // Step 2: Load the ordered rules and take the first match.
        let rules = ctx
            .repos
            .response_rule
            .list(webhook_id)
            .await
            .map_err(|e| FindResponseRuleError::Storage(format!("{e:?}")))?;

        Ok(rule_matching::find_first(&rules, method, sub_path).cloned())
    }
}
