pub mod manager;
pub mod request_store_sqlite;
pub mod response_rule_store_sqlite;

pub use manager::WebhookDatabaseManager;
pub use request_store_sqlite::RequestStoreSqlite;
pub use response_rule_store_sqlite::ResponseRuleStoreSqlite;
