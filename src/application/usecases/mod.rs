pub mod create_webhook;
pub mod find_response_rule;
pub mod get_request;
pub mod get_webhook;
pub mod list_requests;
pub mod record_request;
pub mod update_responses;
