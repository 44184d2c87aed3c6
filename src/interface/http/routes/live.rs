// HTTP routes: WebSocket live notifications.

use crate::infrastructure::events::RequestRecordedEvent;
use crate::interface::http::problem::{problem, WHK_REQUEST_MALFORMED};
use crate::interface::http::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::debug;

/// Builds the live-notification route.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/ws", get(live_updates))
}

#[derive(Debug, Deserialize)]
struct LiveParams {
    #[serde(rename = "webhookId")]
    webhook_id: Option<String>,
}

/// Upgrades the connection and streams recorded-request events for one
/// webhook. A handshake without a webhook id is refused.
async fn live_updates(
    State(state): State<AppState>,
    Query(params): Query<LiveParams>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    // Step 1: Refuse handshakes that don't name a webhook.
    let Some(webhook_id) = params
        .webhook_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    else {
        return problem(
            StatusCode::BAD_REQUEST,
            WHK_REQUEST_MALFORMED,
            Some("webhookId query parameter is required".to_string()),
        );
    };

    // Step 2: This route only speaks WebSocket.
    let Some(ws) = ws else {
        return problem(
            StatusCode::UPGRADE_REQUIRED,
            WHK_REQUEST_MALFORMED,
            Some("websocket upgrade required".to_string()),
        );
    };

    // Step 3: Subscribe before upgrading so no event slips between.
    let receiver = state.ctx.event_bus.subscribe();

    ws.on_upgrade(move |socket| stream_events(socket, receiver, webhook_id))
}

/// Forward matching events until the peer goes away. Delivery is lossy: a
/// lagged subscriber skips what it missed.
async fn stream_events(
    mut socket: WebSocket,
    mut receiver: broadcast::Receiver<RequestRecordedEvent>,
    webhook_id: String,
) {
    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Ok(event) => {
                    if event.webhook_id.as_str() != webhook_id {
                        continue;
                    }
                    let payload = json!({ "type": "request:created", "data": event });
                    let Ok(text) = serde_json::to_string(&payload) else {
                        continue;
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(webhook_id = %webhook_id, skipped, "live subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}
