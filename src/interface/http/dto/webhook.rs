use crate::application::usecases::update_responses::RuleInput;
use crate::domain::entities::response_rule::ResponseRule;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct CreateWebhookResponse {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub id: String,
    pub url: String,
    pub responses: Vec<ResponseRule>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceResponsesRequest {
    #[serde(default)]
    pub responses: Vec<ResponseRuleInput>,
}

/// One rule as supplied by the client; every field is optional and
/// normalized by the use case.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRuleInput {
    pub id: Option<String>,
    pub method: Option<String>,
    pub sub_path: Option<String>,
    pub status: Option<f64>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl ResponseRuleInput {
    pub fn into_rule_input(self) -> RuleInput {
        RuleInput {
            id: self.id,
            method: self.method,
            sub_path: self.sub_path,
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}
