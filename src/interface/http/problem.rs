use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// RFC 7807 Problem Details payload.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub r#type: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// A stable, machine-readable application error code (WHK_...).
    pub code: String,
}

/// Build a Problem Details response with the correct content-type.
pub fn problem(status: StatusCode, code: &str, detail: Option<String>) -> Response {
    // Step 1: Build the problem payload.
    let payload = ProblemDetails {
        r#type: "about:blank".to_string(),
        title: status.canonical_reason().unwrap_or("Error").to_string(),
        status: status.as_u16(),
        detail,
        code: code.to_string(),
    };

    // Step 2: Convert to an HTTP response with JSON body.
    let mut response = (status, Json(payload)).into_response();

    // Step 3: Ensure RFC 7807 content type.
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/problem+json"),
    );

    response
}

// Common WHK error codes.
pub const WHK_REQUEST_MALFORMED: &str = "WHK_REQUEST_MALFORMED";
pub const WHK_WEBHOOK_NOT_FOUND: &str = "WHK_WEBHOOK_NOT_FOUND";
pub const WHK_REQUEST_NOT_FOUND: &str = "WHK_REQUEST_NOT_FOUND";
pub const WHK_STORAGE_DB_ERROR: &str = "WHK_STORAGE_DB_ERROR";
