// HTTP routes: webhook lifecycle and captured-request inspection.

use crate::application::usecases::create_webhook::CreateWebhookUseCase;
use crate::application::usecases::get_request::GetRequestUseCase;
use crate::application::usecases::get_webhook::GetWebhookUseCase;
use crate::application::usecases::list_requests::ListRequestsUseCase;
use crate::application::usecases::update_responses::UpdateResponsesUseCase;
use crate::interface::http::dto::webhook::{
    CreateWebhookResponse, ReplaceResponsesRequest, WebhookResponse,
};
use crate::interface::http::problem::{
    problem, WHK_REQUEST_MALFORMED, WHK_REQUEST_NOT_FOUND, WHK_STORAGE_DB_ERROR,
};
use crate::interface::http::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;

/// Builds webhook management routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/webhooks", post(create_webhook))
        .route(
            "/webhooks/:webhook_id",
            get(get_webhook).put(update_responses),
        )
        .route("/webhooks/:webhook_id/requests", get(list_requests))
        .route(
            "/webhooks/:webhook_id/requests/:request_id",
            get(get_request),
        )
}

/// Public URL a webhook is reachable under: the configured base, or the
/// request's own host.
pub fn build_webhook_url(state: &AppState, headers: &HeaderMap, webhook_id: &str) -> String {
    let base = state
        .settings
        .webhooks
        .public_base_url
        .as_deref()
        .map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or_else(|| {
            let host = headers
                .get(axum::http::header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{host}")
        });
    format!("{base}/hooks/{webhook_id}")
}

/// Creates a webhook ready to accept captures.
async fn create_webhook(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Step 1: Execute the use case.
    let result = CreateWebhookUseCase::execute(&state.ctx).await;

    // Step 2: Map output to HTTP response.
    match result {
        Ok(out) => {
            let url = build_webhook_url(&state, &headers, out.webhook_id.as_str());
            let response = CreateWebhookResponse {
                id: out.webhook_id.0,
                url,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(_) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHK_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
        ),
    }
}

/// Fetches a webhook's response-rule configuration.
async fn get_webhook(
    State(state): State<AppState>,
    Path(webhook_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    // Step 1: Validate the path parameter.
    if webhook_id.trim().is_empty() {
        return problem(
            StatusCode::BAD_REQUEST,
            WHK_REQUEST_MALFORMED,
            Some("webhookId is required".to_string()),
        );
    }

    // Step 2: Execute the use case.
    let result = GetWebhookUseCase::execute(&state.ctx, &webhook_id).await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(out) => {
            let url = build_webhook_url(&state, &headers, out.webhook_id.as_str());
            let response = WebhookResponse {
                id: out.webhook_id.0,
                url,
                responses: out.responses,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(_) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHK_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
        ),
    }
}

/// Replaces a webhook's response rules atomically.
async fn update_responses(
    State(state): State<AppState>,
    Path(webhook_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ReplaceResponsesRequest>,
) -> Response {
    // Step 1: Validate the path parameter.
    if webhook_id.trim().is_empty() {
        return problem(
            StatusCode::BAD_REQUEST,
            WHK_REQUEST_MALFORMED,
            Some("webhookId is required".to_string()),
        );
    }

    // Step 2: Execute the use case with the raw inputs.
    let inputs = payload
        .responses
        .into_iter()
        .map(|input| input.into_rule_input())
        .collect();
    let result = UpdateResponsesUseCase::execute(&state.ctx, &webhook_id, inputs).await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(responses) => {
            let url = build_webhook_url(&state, &headers, &webhook_id);
            let response = WebhookResponse {
                id: webhook_id,
                url,
                responses,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(_) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHK_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
        ),
    }
}

/// Lists a webhook's captured requests, most recent first.
async fn list_requests(State(state): State<AppState>, Path(webhook_id): Path<String>) -> Response {
    // Step 1: Validate the path parameter.
    if webhook_id.trim().is_empty() {
        return problem(
            StatusCode::BAD_REQUEST,
            WHK_REQUEST_MALFORMED,
            Some("webhookId is required".to_string()),
        );
    }

    // Step 2: Execute the use case.
    let result = ListRequestsUseCase::execute(&state.ctx, &webhook_id).await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(_) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHK_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
        ),
    }
}

/// Fetches one captured request in full.
async fn get_request(
    State(state): State<AppState>,
    Path((webhook_id, request_id)): Path<(String, String)>,
) -> Response {
    // Step 1: Validate the path parameters.
    if webhook_id.trim().is_empty() || request_id.trim().is_empty() {
        return problem(
            StatusCode::BAD_REQUEST,
            WHK_REQUEST_MALFORMED,
            Some("webhookId and requestId are required".to_string()),
        );
    }

    // Step 2: Execute the use case.
    let result = GetRequestUseCase::execute(&state.ctx, &webhook_id, &request_id).await;

    // Step 3: Map output to HTTP response.
    match result {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => problem(
            StatusCode::NOT_FOUND,
            WHK_REQUEST_NOT_FOUND,
            Some("request not found".to_string()),
        ),
        Err(_) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            WHK_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
        ),
    }
}
