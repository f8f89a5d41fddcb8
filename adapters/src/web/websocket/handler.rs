use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::StreamExt;
use futures::stream::SplitStream;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use application::ports::in_::SessionServiceError;
use domain::{ItemId, SessionId, SessionSnapshot};

use super::notifier::ConnectionId;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingMessage {
    Subscribe { session_id: SessionId },
    Unsubscribe { session_id: SessionId },
    Buy { session_id: SessionId, item: ItemId },
    Sell { session_id: SessionId, item: ItemId },
    Exit { session_id: SessionId },
}

pub async fn handle_connection(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let connection_id = ConnectionId::new();
        info!(connection_id = ?connection_id, "Client connected");

        let (sender, receiver) = socket.split();
        state.notifier.register_connection(connection_id, sender).await;

        handle_messages(connection_id, receiver, state).await;
    })
}

async fn handle_messages(
    connection_id: ConnectionId,
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
) {
    while let Some(Ok(message)) = receiver.next().await {
        if let Message::Text(text) = message {
            debug!(connection_id = ?connection_id, message = %text, "<- Received");

            match serde_json::from_str::<IncomingMessage>(&text) {
                Ok(incoming) => handle_incoming(connection_id, incoming, &state).await,
                Err(e) => {
                    warn!(connection_id = ?connection_id, error = %e, "Failed to parse message");
                }
            }
        }
    }

    info!(connection_id = ?connection_id, "Client disconnected");
    let orphaned = state.notifier.unregister_connection(connection_id).await;

    // Nobody is left to drive or watch these sessions
    for session_id in orphaned {
        if state.sessions.close(session_id).await {
            info!(connection_id = ?connection_id, session_id = %session_id, "Closed unwatched session");
        }
    }
}

async fn handle_incoming(
    connection_id: ConnectionId,
    incoming: IncomingMessage,
    state: &AppState,
) {
    let (session_id, result) = match incoming {
        IncomingMessage::Subscribe { session_id } => {
            state.notifier.subscribe(connection_id, session_id).await;
            (session_id, state.sessions.snapshot(session_id).await)
        }
        IncomingMessage::Unsubscribe { session_id } => {
            state.notifier.unsubscribe(connection_id, session_id).await;
            return;
        }
        IncomingMessage::Buy { session_id, item } => (session_id, state.sessions.buy(session_id, item).await),
        IncomingMessage::Sell { session_id, item } => (session_id, state.sessions.sell(session_id, item).await),
        IncomingMessage::Exit { session_id } => (session_id, state.sessions.exit(session_id).await),
    };

    reply(connection_id, session_id, result, state).await;
}

// Player-facing rejections already reach subscribers as notices; the sender
// additionally gets the snapshot or error as a direct reply.
async fn reply(
    connection_id: ConnectionId,
    session_id: SessionId,
    result: Result<SessionSnapshot, SessionServiceError>,
    state: &AppState,
) {
    let body = match result {
        Ok(snapshot) => json!({ "type": "snapshot", "session_id": session_id, "snapshot": snapshot }),
        Err(e) => {
            debug!(connection_id = ?connection_id, session_id = %session_id, error = %e, "Intent rejected");
            json!({ "type": "error", "session_id": session_id, "message": e.to_string() })
        }
    };
    state.notifier.send_to_connection(connection_id, &body.to_string()).await;
}
