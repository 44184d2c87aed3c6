// HTTP routes: the catch-all capture endpoint.

use crate::application::usecases::find_response_rule::FindResponseRuleUseCase;
use crate::application::usecases::record_request::{
    RecordRequestCommand, RecordRequestError, RecordRequestUseCase,
};
use crate::domain::entities::response_rule::ResponseRule;
use crate::domain::services::admission::LimitKind;
use crate::interface::http::dto::capture::CaptureAccepted;
use crate::interface::http::problem::{
    problem, WHK_REQUEST_MALFORMED, WHK_STORAGE_DB_ERROR, WHK_WEBHOOK_NOT_FOUND,
};
use crate::interface::http::state::AppState;
use axum::extract::connect_info::ConnectInfo;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Json;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::warn;

/// Builds the catch-all capture routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/hooks/:webhook_id", any(capture))
        .route("/hooks/:webhook_id/*subpath", any(capture))
}

/// Records an inbound request and replies with a matched rule or the generic
/// acknowledgement.
async fn capture(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
) -> Response {
    // Step 1: Extract the webhook id and rule-matching sub-path.
    let Some(webhook_id) = params
        .get("webhook_id")
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    else {
        return problem(
            StatusCode::BAD_REQUEST,
            WHK_REQUEST_MALFORMED,
            Some("webhookId is required".to_string()),
        );
    };
    let sub_path = match params.get("subpath") {
        Some(rest) => format!("/{rest}"),
        None => "/".to_string(),
    };

    // Step 2: Dismantle the request into the captured attributes.
    let (parts, body) = request.into_parts();
    let method = parts.method.as_str().to_string();
    let path = parts.uri.path().to_string();
    let query_string = parts.uri.query().map(str::to_string);
    let query = parse_query(query_string.as_deref());
    let headers = build_header_map(&parts.headers);
    let content_type = header_value(&parts.headers, header::CONTENT_TYPE);
    let content_length = header_value(&parts.headers, header::CONTENT_LENGTH)
        .and_then(|v| v.parse::<i64>().ok());
    let host = header_value(&parts.headers, header::HOST);
    let ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string());
    let url = host
        .as_deref()
        .map(|host| format!("http://{host}{}", parts.uri));

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return problem(
                StatusCode::BAD_REQUEST,
                WHK_REQUEST_MALFORMED,
                Some("unable to read request body".to_string()),
            );
        }
    };
    let body = parse_body(&bytes, content_type.as_deref());

    let cmd = RecordRequestCommand {
        webhook_id: webhook_id.clone(),
        method: method.clone(),
        path,
        headers,
        query,
        query_string,
        body,
        ip,
        url,
        protocol: Some("http".to_string()),
        host,
        origin: header_value(&parts.headers, header::ORIGIN),
        referrer: header_value(&parts.headers, header::REFERER),
        user_agent: header_value(&parts.headers, header::USER_AGENT),
        content_type,
        content_length,
        id: None,
        created_at: None,
    };

    // Step 3: Record the capture.
    let record = match RecordRequestUseCase::execute(&state.ctx, cmd).await {
        Ok(record) => record,
        Err(RecordRequestError::WebhookNotFound) => {
            return problem(
                StatusCode::NOT_FOUND,
                WHK_WEBHOOK_NOT_FOUND,
                Some("webhook not found".to_string()),
            );
        }
        Err(RecordRequestError::Limit(kind)) => return limit_response(kind),
        Err(RecordRequestError::Storage(_)) => {
            return problem(
                StatusCode::SERVICE_UNAVAILABLE,
                WHK_STORAGE_DB_ERROR,
                Some("storage unavailable".to_string()),
            );
        }
    };

    // Step 4: Reply with a matched rule, or the generic acknowledgement.
    match FindResponseRuleUseCase::execute(&state.ctx, &webhook_id, &method, &sub_path).await {
        Ok(Some(rule)) => rule_response(&rule),
        Ok(None) => accepted_response(record.id.0),
        Err(err) => {
            warn!(webhook_id = %webhook_id, "rule lookup failed after capture: {err:?}");
            accepted_response(record.id.0)
        }
    }
}

fn accepted_response(id: String) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(CaptureAccepted { id, stored: true }),
    )
        .into_response()
}

fn limit_response(kind: LimitKind) -> Response {
    let message = match kind {
        LimitKind::TotalLimit => "Request limit reached for this webhook",
        LimitKind::RateLimit => "Too many requests, retry later",
    };
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": message, "code": kind.code() })),
    )
        .into_response()
}

/// Materialize a matched rule as the HTTP reply.
fn rule_response(rule: &ResponseRule) -> Response {
    let status = StatusCode::from_u16(rule.status).unwrap_or(StatusCode::OK);

    let (default_type, payload) = match &rule.body {
        Value::Null => (None, String::new()),
        // A plain-string body is sent verbatim unless the rule asks for JSON.
        Value::String(text)
            if !rule
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.contains("json")) =>
        {
            (Some("text/plain; charset=utf-8"), text.clone())
        }
        value => (
            Some("application/json"),
            serde_json::to_string(value).unwrap_or_default(),
        ),
    };

    let content_type = rule
        .content_type
        .clone()
        .or_else(|| default_type.map(str::to_string));

    let mut response = (status, payload).into_response();
    if let Some(content_type) = content_type {
        if let Ok(value) = axum::http::HeaderValue::from_str(&content_type) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
    }
    response
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Flatten the header map to JSON; repeated names are joined with a comma,
/// the way Node's HTTP stack presented them in this service's wire format.
fn build_header_map(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, value) in headers {
        let text = String::from_utf8_lossy(value.as_bytes()).to_string();
        match map.entry(name.as_str().to_string()) {
            serde_json::map::Entry::Occupied(mut slot) => {
                if let Value::String(existing) = slot.get_mut() {
                    existing.push_str(", ");
                    existing.push_str(&text);
                }
            }
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(Value::String(text));
            }
        }
    }
    map
}

fn parse_query(query_string: Option<&str>) -> Map<String, Value> {
    let Some(raw) = query_string else {
        return Map::new();
    };
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert(key, Value::String(value));
    }
    map
}

/// Decode the raw body: JSON parses as JSON, forms become an object, anything
/// else is kept as text. An empty body records as null.
fn parse_body(bytes: &[u8], content_type: Option<&str>) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    let text = String::from_utf8_lossy(bytes).to_string();
    let content_type = content_type.unwrap_or_default();

    if content_type.contains("application/json") {
        return serde_json::from_slice(bytes).unwrap_or(Value::String(text));
    }
    if content_type.contains("application/x-www-form-urlencoded") {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes).unwrap_or_default();
        let mut map = Map::new();
        for (key, value) in pairs {
            map.insert(key, Value::String(value));
        }
        return Value::Object(map);
    }
    // Bodies sent without a content type are still frequently JSON.
    serde_json::from_slice(bytes).unwrap_or(Value::String(text))
}
