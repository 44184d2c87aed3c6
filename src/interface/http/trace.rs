use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use tracing::info;

/// A per-request trace identifier used for support and debugging.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Injects a trace id, emits a structured request log, and records HTTP
/// metrics.
pub async fn trace_middleware(req: Request<axum::body::Body>, next: Next) -> Response {
    // Step 1: Reuse a client-provided id or generate a new one.
    let trace_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let trace_id = TraceId(trace_id);

    // Step 2: Capture request metadata and start the timer.
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    // Step 3: Run the request with the trace id attached.
    let mut req = req;
    req.extensions_mut().insert(trace_id.clone());
    let mut response = next.run(req).await;

    // Step 4: Emit metrics and a structured log entry.
    let latency_ms = start.elapsed().as_millis() as u64;
    let status_code = response.status().as_u16();
    let status_label = match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    counter!("http_requests_total", "status" => status_label).increment(1);
    histogram!("http_request_duration_ms", "status" => status_label).record(latency_ms as f64);
    info!(
        trace_id = %trace_id.0,
        method = %method,
        path = %path,
        status = status_code,
        latency_ms,
        "http_request"
    );

    // Step 5: Reflect the trace id back to the caller.
    if let Ok(value) = HeaderValue::from_str(&trace_id.0) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static("x-request-id"), value);
    }

    response
}
