use crate::domain::value_objects::ids::{RuleId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method sentinel that matches every request method.
pub const METHOD_ANY: &str = "ANY";

/// Sub-path sentinel that matches every request path.
pub const SUB_PATH_WILDCARD: &str = "*";

/// A fixed response replayed to callers of a capture endpoint.
///
/// Rules are totally ordered by `position` within one webhook and evaluated
/// first-match-wins. They change only through whole-list replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRule {
    pub id: RuleId,
    pub webhook_id: WebhookId,
    pub method: String,
    pub sub_path: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Value,
    pub position: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ResponseRule {
    /// Whether this rule applies to an already-normalized method/sub-path pair.
    pub fn matches(&self, method: &str, sub_path: &str) -> bool {
        (self.method == METHOD_ANY || self.method == method)
            && (self.sub_path == SUB_PATH_WILDCARD || self.sub_path == sub_path)
    }
}
