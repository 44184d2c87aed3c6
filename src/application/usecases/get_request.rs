// Use case: get_request.

use crate::application::context::AppContext;
use crate::domain::entities::captured_request::CapturedRequest;

/// Fetches one captured request by id.
pub struct GetRequestUseCase;

#[derive(Debug)]
pub enum GetRequestError {
    Storage(String),
}

impl GetRequestUseCase {
    pub async fn execute(
        ctx: &AppContext,
        webhook_id: &str,
        request_id: &str,
    ) -> Result<Option<CapturedRequest>, GetRequestError> {
        // Step 1: Make sure the storage unit and schema exist.
        ctx.repos
            .request
            .prepare(webhook_id)
            .await
            .map_err(|e| GetRequestError::Storage(format!("{e:?}")))?;

        // Step 2: Point lookup by id.
        ctx.repos
            .request
            .find(webhook_id, request_id)
            .await
            .map_err(|e| GetRequestError::Storage(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{GetRequestError, GetRequestUseCase};
    use crate::application::context::test_support::test_context;
    use crate::infrastructure::db::dto::{RequestRow, RequestSummaryRow};
    use crate::infrastructure::db::repositories::request_repository::RequestRepository;
    use crate::infrastructure::db::stores::request_store::{RequestRepositoryError, RequestStore};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct SingleRecordStore;

    #[async_trait]
    impl RequestStore for SingleRecordStore {
        async fn prepare(&self, _webhook_id: &str) -> Result<(), RequestRepositoryError> {
            Ok(())
        }

        async fn save(&self, _row: &RequestRow) -> Result<(), RequestRepositoryError> {
            Ok(())
        }

        async fn list(
            &self,
            _webhook_id: &str,
        ) -> Result<Vec<RequestSummaryRow>, RequestRepositoryError> {
            Ok(vec![])
        }

        async fn find(
            &self,
            _webhook_id: &str,
            request_id: &str,
        ) -> Result<Option<RequestRow>, RequestRepositoryError> {
            if request_id != "req-1" {
                return Ok(None);
            }
            Ok(Some(RequestRow {
                id: "req-1".to_string(),
                webhook_id: "hook-1".to_string(),
                method: "GET".to_string(),
                path: "/".to_string(),
                headers: "{}".to_string(),
                query: "{}".to_string(),
                query_string: None,
                body: Some("null".to_string()),
                ip: None,
                url: None,
                protocol: None,
                host: None,
                origin: None,
                referrer: None,
                user_agent: None,
                content_type: None,
                content_length: None,
                created_at: "2024-05-01T00:00:00Z".to_string(),
            }))
        }

        async fn count(&self, _webhook_id: &str) -> Result<i64, RequestRepositoryError> {
            Ok(1)
        }

        async fn exists(&self, _webhook_id: &str) -> Result<bool, RequestRepositoryError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn given_stored_request_when_fetched_should_return_entity() {
        let mut ctx = test_context();
        ctx.repos.request = Arc::new(RequestRepository::new(Arc::new(SingleRecordStore)));

        let found = GetRequestUseCase::execute(&ctx, "hook-1", "req-1")
            .await
            .unwrap();

        let record = found.expect("record");
        assert_eq!(record.id.as_str(), "req-1");
        assert_eq!(record.method, "GET");
    }

    #[tokio::test]
    async fn given_unknown_request_id_when_fetched_should_return_none() {
        let mut ctx = test_context();
        ctx.repos.request = Arc::new(RequestRepository::new(Arc::new(SingleRecordStore)));

        let found = GetRequestUseCase::execute(&ctx, "hook-1", "other")
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn given_failing_store_when_fetched_should_return_storage_error() {
        let ctx = test_context();

        let result = GetRequestUseCase::execute(&ctx, "hook-1", "req-1").await;

        assert!(matches!(result, Err(GetRequestError::Storage(_))));
    }
}
