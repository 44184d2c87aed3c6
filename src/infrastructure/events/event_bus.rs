use crate::domain::entities::captured_request::{CapturedRequest, RequestSummary};
use crate::domain::value_objects::ids::WebhookId;
use serde::Serialize;
use tokio::sync::broadcast;

/// Published after a captured request has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecordedEvent {
    pub webhook_id: WebhookId,
    pub summary: RequestSummary,
    pub request: CapturedRequest,
}

/// In-process fan-out for recorded-request events.
///
/// Delivery is at-most-once and lossy: events published with no subscribers
/// are dropped, and a subscriber that falls behind skips the missed events.
#[derive(Clone)]
pub struct WebhookEventBus {
    sender: broadcast::Sender<RequestRecordedEvent>,
}

impl WebhookEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Synchronous publish; never blocks and never fails.
    pub fn emit_request_recorded(&self, event: RequestRecordedEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RequestRecordedEvent> {
        self.sender.subscribe()
    }
}

impl Default for WebhookEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
