// Use case: record_request.

use crate::application::context::AppContext;
use crate::domain::entities::captured_request::CapturedRequest;
use crate::domain::services::admission::LimitKind;
use crate::domain::value_objects::ids::{RequestId, WebhookId};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::events::RequestRecordedEvent;
use metrics::counter;
use serde_json::{Map, Value};
use tracing::instrument;

/// Persists one inbound capture after admission control and announces it on
/// the event bus.
pub struct RecordRequestUseCase;

#[derive(Debug)]
pub enum RecordRequestError {
    /// The target webhook was never created; nothing is provisioned for it.
    WebhookNotFound,
    /// Admission rejected the capture; recoverable by retrying later.
    Limit(LimitKind),
    Storage(String),
}

#[derive(Debug, Clone)]
pub struct RecordRequestCommand {
    pub webhook_id: String,
    pub method: String,
    pub path: String,
    pub headers: Map<String, Value>,
    pub query: Map<String, Value>,
    pub query_string: Option<String>,
    pub body: Value,
    pub ip: Option<String>,
    pub url: Option<String>,
    pub protocol: Option<String>,
    pub host: Option<String>,
    pub origin: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    /// Caller-supplied id for idempotent re-delivery; generated when absent.
    pub id: Option<String>,
    /// Caller-supplied creation time; server time when absent.
    pub created_at: Option<Timestamp>,
}

impl RecordRequestUseCase {
    /// Admission-check, persist, and publish one captured request.
    ///
    /// Rejections happen before anything is persisted; a storage failure
    /// after admission aborts the request with no partial record.
    #[instrument(skip(ctx, cmd), fields(webhook_id = %cmd.webhook_id))]
    pub async fn execute(
        ctx: &AppContext,
        cmd: RecordRequestCommand,
    ) -> Result<CapturedRequest, RecordRequestError> {
        // Step 1: Reject captures against webhooks that were never created.
        let exists = ctx
            .repos
            .request
            .exists(&cmd.webhook_id)
            .await
            .map_err(|e| RecordRequestError::Storage(format!("{e:?}")))?;
        if !exists {
            return Err(RecordRequestError::WebhookNotFound);
        }

        // Step 2: Run admission control (total capacity, then rate).
        let stored = ctx
            .repos
            .request
            .count(&cmd.webhook_id)
            .await
            .map_err(|e| RecordRequestError::Storage(format!("{e:?}")))?;
        if let Err(kind) = ctx.admission.admit(&cmd.webhook_id, stored) {
            counter!("webhook_requests_rejected_total", "code" => kind.code()).increment(1);
            return Err(RecordRequestError::Limit(kind));
        }

        // Step 3: Fill server-side defaults and build the record.
        let record = CapturedRequest {
            id: cmd.id.map(RequestId::from).unwrap_or_default(),
            webhook_id: WebhookId::from(cmd.webhook_id),
            method: cmd.method,
            path: cmd.path,
            headers: cmd.headers,
            query: cmd.query,
            query_string: cmd.query_string,
            body: cmd.body,
            ip: cmd.ip,
            url: cmd.url,
            protocol: cmd.protocol,
            host: cmd.host,
            origin: cmd.origin,
            referrer: cmd.referrer,
            user_agent: cmd.user_agent,
            content_type: cmd.content_type,
            content_length: cmd.content_length,
            created_at: cmd.created_at.unwrap_or_else(Timestamp::now_utc),
        };

        // Step 4: Persist.
        ctx.repos
            .request
            .prepare(record.webhook_id.as_str())
            .await
            .map_err(|e| RecordRequestError::Storage(format!("{e:?}")))?;
        ctx.repos
            .request
            .save(&record)
            .await
            .map_err(|e| RecordRequestError::Storage(format!("{e:?}")))?;

        // Step 5: Announce the stored record to live observers.
        ctx.event_bus.emit_request_recorded(RequestRecordedEvent {
            webhook_id: record.webhook_id.clone(),
            summary: record.summary(),
            request: record.clone(),
        });
        counter!("webhook_requests_recorded_total").increment(1);

        Ok(record)
    }
}
