use crate::domain::entities::captured_request::{CapturedRequest, RequestSummary};
use crate::domain::value_objects::ids::{RequestId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::dto::{parse_object, parse_unknown, serialize_value};
use serde_json::Value;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequestRow {
    pub id: String,
    pub webhook_id: String,
    pub method: String,
    pub path: String,
    pub headers: String,
    pub query: String,
    pub query_string: Option<String>,
    pub body: Option<String>,
    pub ip: Option<String>,
    pub url: Option<String>,
    pub protocol: Option<String>,
    pub host: Option<String>,
    pub origin: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    pub created_at: String,
}

impl RequestRow {
    pub fn from_entity(request: &CapturedRequest) -> Self {
        Self {
            id: request.id.0.clone(),
            webhook_id: request.webhook_id.0.clone(),
            method: request.method.clone(),
            path: request.path.clone(),
            headers: serialize_value(&Value::Object(request.headers.clone())),
            query: serialize_value(&Value::Object(request.query.clone())),
            query_string: request.query_string.clone(),
            body: Some(serialize_value(&request.body)),
            ip: request.ip.clone(),
            url: request.url.clone(),
            protocol: request.protocol.clone(),
            host: request.host.clone(),
            origin: request.origin.clone(),
            referrer: request.referrer.clone(),
            user_agent: request.user_agent.clone(),
            content_type: request.content_type.clone(),
            content_length: request.content_length,
            created_at: request.created_at.to_rfc3339(),
        }
    }

    pub fn into_entity(self) -> CapturedRequest {
        CapturedRequest {
            id: RequestId::from(self.id),
            webhook_id: WebhookId::from(self.webhook_id),
            method: self.method,
            path: self.path,
            headers: parse_object(&self.headers),
            query: parse_object(&self.query),
            query_string: self.query_string,
            body: parse_unknown(self.body.as_deref()),
            ip: self.ip,
            url: self.url,
            protocol: self.protocol,
            host: self.host,
            origin: self.origin,
            referrer: self.referrer,
            user_agent: self.user_agent,
            content_type: self.content_type,
            content_length: self.content_length,
            created_at: Timestamp::parse_lossy(&self.created_at),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequestSummaryRow {
    pub id: String,
    pub method: String,
    pub path: String,
    pub created_at: String,
}

impl RequestSummaryRow {
    pub fn into_entity(self) -> RequestSummary {
        RequestSummary {
            id: RequestId::from(self.id),
            method: self.method,
            path: self.path,
            created_at: Timestamp::parse_lossy(&self.created_at),
        }
    }
}
