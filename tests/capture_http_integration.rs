use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use hookbin::application::context::AppContext;
use hookbin::config::{Server, Settings, Storage, Webhooks};
use hookbin::domain::services::admission::AdmissionPolicy;
use hookbin::infrastructure::db::repositories::Repositories;
use hookbin::infrastructure::db::sqlite::WebhookDatabaseManager;
use hookbin::infrastructure::events::WebhookEventBus;
use hookbin::interface::http;
use hookbin::interface::http::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

fn build_state(dir: &TempDir, max_requests: i64, rate_limit: u32) -> AppState {
    let settings = Settings {
        server: Server {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: Storage {
            base_path: dir.path().to_string_lossy().to_string(),
            max_databases: 100,
        },
        webhooks: Webhooks {
            max_requests,
            rate_limit,
            rate_window_ms: 1000,
            public_base_url: Some("http://hooks.test".to_string()),
        },
    };

    let manager = Arc::new(
        WebhookDatabaseManager::new(dir.path(), settings.storage.max_databases).unwrap(),
    );
    let ctx = AppContext::new(
        Repositories::sqlite(manager),
        AdmissionPolicy::new(
            settings.webhooks.max_requests,
            settings.webhooks.rate_limit,
            Duration::from_millis(settings.webhooks.rate_window_ms),
        ),
        WebhookEventBus::default(),
    );

    AppState {
        ctx: Arc::new(ctx),
        settings,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_webhook(state: &AppState) -> String {
    let response = http::app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn created_webhook_advertises_capture_url() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["id"].as_str().unwrap();
    assert_eq!(
        json["url"].as_str().unwrap(),
        format!("http://hooks.test/hooks/{id}")
    );
}

#[tokio::test]
async fn capture_stores_request_and_acknowledges() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);
    let webhook_id = create_webhook(&state).await;

    let response = http::app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/hooks/{webhook_id}/orders?page=2"))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::USER_AGENT, "integration-test")
                .body(Body::from(r#"{"total": 12}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let ack = body_json(response).await;
    assert_eq!(ack["stored"], Value::Bool(true));
    let request_id = ack["id"].as_str().unwrap().to_string();

    // The record is listable and fully inspectable.
    let response = http::app(state.clone())
        .oneshot(
            Request::builder()
                .uri(format!("/webhooks/{webhook_id}/requests"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"].as_str().unwrap(), request_id);
    assert_eq!(list[0]["method"], "POST");

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri(format!("/webhooks/{webhook_id}/requests/{request_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["webhookId"].as_str().unwrap(), webhook_id);
    assert_eq!(record["body"]["total"], 12);
    assert_eq!(record["query"]["page"], "2");
    assert_eq!(record["queryString"], "page=2");
    assert_eq!(record["headers"]["user-agent"], "integration-test");
}

#[tokio::test]
async fn capture_against_unknown_webhook_is_rejected_without_storage() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/hooks/never-created")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!dir.path().join("never-created.sqlite").exists());
}

#[tokio::test]
async fn capture_over_total_limit_returns_machine_readable_429() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 1, 0);
    let webhook_id = create_webhook(&state).await;

    let first = http::app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/hooks/{webhook_id}"))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = http::app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/hooks/{webhook_id}"))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(second).await;
    assert_eq!(json["code"], "total_limit");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn capture_over_rate_limit_returns_machine_readable_429() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 2);
    let webhook_id = create_webhook(&state).await;

    for _ in 0..2 {
        let response = http::app(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/hooks/{webhook_id}"))
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    let third = http::app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/hooks/{webhook_id}"))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(third).await;
    assert_eq!(json["code"], "rate_limit");
}

#[tokio::test]
async fn replaced_rules_are_replayed_to_matching_captures() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);
    let webhook_id = create_webhook(&state).await;

    let payload = r#"{
        "responses": [
            {"method": "get", "subPath": "a", "status": 418, "contentType": "application/json", "body": {"teapot": true}},
            {"method": "*", "subPath": "*", "status": 204}
        ]
    }"#;
    let response = http::app(state.clone())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/webhooks/{webhook_id}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let config = body_json(response).await;
    assert_eq!(config["responses"][0]["method"], "GET");
    assert_eq!(config["responses"][0]["subPath"], "/a");
    assert_eq!(config["responses"][1]["method"], "ANY");
    assert_eq!(config["responses"][1]["position"], 1);

    // Exact match wins.
    let response = http::app(state.clone())
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/hooks/{webhook_id}/a"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["teapot"], Value::Bool(true));

    // Anything else falls through to the wildcard rule.
    let response = http::app(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/hooks/{webhook_id}/other"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The matched captures were still recorded.
    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri(format!("/webhooks/{webhook_id}/requests"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn webhook_config_fetch_returns_current_rules() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);
    let webhook_id = create_webhook(&state).await;

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri(format!("/webhooks/{webhook_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"].as_str().unwrap(), webhook_id);
    assert!(json["responses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_request_lookup_returns_problem_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);
    let webhook_id = create_webhook(&state).await;

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri(format!("/webhooks/{webhook_id}/requests/unknown"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "WHK_REQUEST_NOT_FOUND");
}

#[tokio::test]
async fn live_handshake_without_webhook_id_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri("/ws")
                .header(header::CONNECTION, "upgrade")
                .header(header::UPGRADE, "websocket")
                .header(header::SEC_WEBSOCKET_VERSION, "13")
                .header(header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ==")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "WHK_REQUEST_MALFORMED");
}

#[tokio::test]
async fn live_handshake_without_upgrade_headers_is_not_a_websocket() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);
    let webhook_id = create_webhook(&state).await;

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri(format!("/ws?webhookId={webhook_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
}

#[tokio::test]
async fn every_response_carries_a_request_id_header() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, 100, 0);

    let response = http::app(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}
