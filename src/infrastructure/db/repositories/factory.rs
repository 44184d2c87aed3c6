use crate::infrastructure::db::repositories::request_repository::RequestRepository;
use crate::infrastructure::db::repositories::response_rule_repository::ResponseRuleRepository;
use crate::infrastructure::db::sqlite::{
    RequestStoreSqlite, ResponseRuleStoreSqlite, WebhookDatabaseManager,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct Repositories {
    pub request: Arc<RequestRepository>,
    pub response_rule: Arc<ResponseRuleRepository>,
}

impl Repositories {
    /// Build both repositories backed by SQLite stores sharing one database
    /// manager.
    pub fn sqlite(manager: Arc<WebhookDatabaseManager>) -> Self {
        let request_store = Arc::new(RequestStoreSqlite::new(manager.clone()));
        let response_rule_store = Arc::new(ResponseRuleStoreSqlite::new(manager));

        Self {
            request: Arc::new(RequestRepository::new(request_store)),
            response_rule: Arc::new(ResponseRuleRepository::new(response_rule_store)),
        }
    }
}
