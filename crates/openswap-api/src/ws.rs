//! Websocket bridge: one subscription per connection.
//!
//! Clients connect to `/ws` (optionally `/ws?user_id=<uuid>` to also receive
//! their targeted events) and get every matching envelope as a JSON text
//! frame. The channel is outbound-only; inbound frames other than close are
//! ignored.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use openswap_types::UserId;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub user_id: Option<Uuid>,
}

/// Websocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let user = query.user_id.map(UserId);
    ws.on_upgrade(move |socket| handle_socket(socket, state, user))
}

/// Manage one connection's lifecycle: subscribe, forward, clean up.
async fn handle_socket(socket: WebSocket, state: AppState, user: Option<UserId>) {
    let (subscriber, mut envelopes) = state.bus.subscribe(user);
    tracing::info!(%subscriber, user = ?user, "websocket connected");

    let (mut sender, mut receiver) = socket.split();

    // Forward bus envelopes to the socket until either side goes away.
    let send_task = tokio::spawn(async move {
        while let Some(envelope) = envelopes.recv().await {
            let frame = match envelope.to_json() {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(%err, "dropping unserializable envelope");
                    continue;
                }
            };
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    // Drain inbound frames; only close (or a dead socket) ends the session.
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    state.bus.unsubscribe(subscriber);
    send_task.abort();
    tracing::info!(%subscriber, "websocket disconnected");
}
