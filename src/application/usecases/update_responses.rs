// Use case: update_responses.

use crate::application::context::AppContext;
use crate::domain::entities::response_rule::ResponseRule;
use crate::domain::services::rule_matching::{
    normalize_content_type, normalize_method, normalize_status, normalize_sub_path,
};
use crate::domain::value_objects::ids::{RuleId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use serde_json::Value;
use std::collections::HashMap;

/// Atomically replaces a webhook's response-rule list with a normalized one.
pub struct UpdateResponsesUseCase;

#[derive(Debug)]
pub enum UpdateResponsesError {
    Storage(String),
}

/// Raw rule input as supplied by the caller, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RuleInput {
    pub id: Option<String>,
    pub method: Option<String>,
    pub sub_path: Option<String>,
    pub status: Option<f64>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl UpdateResponsesUseCase {
    /// Normalize the inputs, keep creation times for rules whose id already
    /// exists, and swap the whole list in one transaction.
    pub async fn execute(
        ctx: &AppContext,
        webhook_id: &str,
        inputs: Vec<RuleInput>,
    ) -> Result<Vec<ResponseRule>, UpdateResponsesError> {
        // Step 1: Make sure the storage unit and schema exist.
        ctx.repos
            .response_rule
            .prepare(webhook_id)
            .await
            .map_err(|e| UpdateResponsesError::Storage(format!("{e:?}")))?;

        // Step 2: Load the previous list to preserve creation times by id.
        let previous = ctx
            .repos
            .response_rule
            .list(webhook_id)
            .await
            .map_err(|e| UpdateResponsesError::Storage(format!("{e:?}")))?;
        let previous_by_id: HashMap<&str, &ResponseRule> = previous
            .iter()
            .map(|rule| (rule.id.as_str(), rule))
            .collect();

        // Step 3: Normalize every input; position follows input order.
        let now = Timestamp::now_utc();
        let normalized: Vec<ResponseRule> = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let id = match input.id.as_deref().map(str::trim) {
                    Some(id) if !id.is_empty() => RuleId::from(id),
                    _ => RuleId::new(),
                };
                let created_at = previous_by_id
                    .get(id.as_str())
                    .map(|existing| existing.created_at)
                    .unwrap_or(now);

                ResponseRule {
                    id,
                    webhook_id: WebhookId::from(webhook_id),
                    method: normalize_method(input.method.as_deref().unwrap_or_default()),
                    sub_path: normalize_sub_path(input.sub_path.as_deref().unwrap_or_default()),
                    status: normalize_status(input.status),
                    content_type: normalize_content_type(input.content_type.as_deref()),
                    body: input.body.unwrap_or(Value::Null),
                    position: index as u32,
                    created_at,
                    updated_at: now,
                }
            })
            .collect();

        // Step 4: Atomic whole-list swap.
        ctx.repos
            .response_rule
            .replace_all(webhook_id, &normalized)
            .await
            .map_err(|e| UpdateResponsesError::Storage(format!("{e:?}")))?;

        Ok(normalized)
    }
}
