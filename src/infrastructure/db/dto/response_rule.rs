use crate::domain::entities::response_rule::ResponseRule;
use crate::domain::value_objects::ids::{RuleId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::dto::{parse_unknown, serialize_value};
use serde_json::Value;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResponseRuleRow {
    pub id: String,
    pub webhook_id: String,
    pub method: String,
    pub sub_path: String,
    pub status: i64,
    pub content_type: Option<String>,
    pub body: Option<String>,
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ResponseRuleRow {
    pub fn from_entity(rule: &ResponseRule) -> Self {
        Self {
            id: rule.id.0.clone(),
            webhook_id: rule.webhook_id.0.clone(),
            method: rule.method.clone(),
            sub_path: rule.sub_path.clone(),
            status: i64::from(rule.status),
            content_type: rule.content_type.clone(),
            body: match &rule.body {
                Value::Null => None,
                value => Some(serialize_value(value)),
            },
            position: i64::from(rule.position),
            created_at: rule.created_at.to_rfc3339(),
            updated_at: rule.updated_at.to_rfc3339(),
        }
    }

    pub fn into_entity(self) -> ResponseRule {
        ResponseRule {
            id: RuleId::from(self.id),
            webhook_id: WebhookId::from(self.webhook_id),
            method: self.method,
            sub_path: self.sub_path,
            status: self.status.clamp(100, 599) as u16,
            content_type: self.content_type,
            body: parse_unknown(self.body.as_deref()),
            position: self.position.max(0) as u32,
            created_at: Timestamp::parse_lossy(&self.created_at),
            updated_at: Timestamp::parse_lossy(&self.updated_at),
        }
    }
}
