use crate::domain::value_objects::ids::{RequestId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One HTTP request delivered to a webhook's capture endpoint.
///
/// Records are immutable once stored; there is no update operation, and
/// individual records are only removed when the whole storage unit is
/// evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRequest {
    pub id: RequestId,
    pub webhook_id: WebhookId,
    pub method: String,
    pub path: String,
    pub headers: Map<String, Value>,
    pub query: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    pub body: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    pub created_at: Timestamp,
}

impl CapturedRequest {
    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            id: self.id.clone(),
            method: self.method.clone(),
            path: self.path.clone(),
            created_at: self.created_at,
        }
    }
}

/// List projection of a captured request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: RequestId,
    pub method: String,
    pub path: String,
    pub created_at: Timestamp,
}
