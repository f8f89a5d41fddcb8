use std::collections::HashSet;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::SinkExt;
use futures::stream::SplitSink;
use serde::Serialize;
use tokio::sync::{Mutex as TokioMutex, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use application::ports::out_::{SessionNotification, SessionNotifier};
use domain::SessionId;

pub(crate) type WebSocketSender = SplitSink<WebSocket, Message>;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct Outgoing<'a> {
    session_id: SessionId,
    #[serde(flatten)]
    notification: &'a SessionNotification,
}

struct Connection {
    id: ConnectionId,
    sender: TokioMutex<WebSocketSender>,
    subscriptions: RwLock<HashSet<SessionId>>,
}

/// Fans session notifications out to every socket subscribed to the session.
pub struct WebSocketNotifier {
    connections: RwLock<Vec<Connection>>,
}

impl WebSocketNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(Vec::new()),
        }
    }

    pub async fn register_connection(
        &self,
        connection_id: ConnectionId,
        sender: WebSocketSender,
    ) {
        self.connections.write().await.push(Connection {
            id: connection_id,
            sender: TokioMutex::new(sender),
            subscriptions: RwLock::new(HashSet::new()),
        });
    }

    /// Drops a connection and returns the sessions it leaves without any subscriber.
    pub async fn unregister_connection(
        &self,
        connection_id: ConnectionId,
    ) -> Vec<SessionId> {
        let mut connections = self.connections.write().await;
        let Some(index) = connections.iter().position(|c| c.id == connection_id) else {
            return Vec::new();
        };
        let leaving = connections.remove(index).subscriptions.into_inner();

        let mut remaining = HashSet::new();
        for connection in connections.iter() {
            remaining.extend(connection.subscriptions.read().await.iter().copied());
        }
        orphaned_sessions(leaving, &remaining)
    }

    pub async fn subscribe(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
    ) {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.iter().find(|c| c.id == connection_id) {
            connection.subscriptions.write().await.insert(session_id);
        }
    }

    pub async fn unsubscribe(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
    ) {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.iter().find(|c| c.id == connection_id) {
            connection.subscriptions.write().await.remove(&session_id);
        }
    }

    /// Sends a raw text frame to one connection.
    pub(crate) async fn send_to_connection(
        &self,
        connection_id: ConnectionId,
        message: &str,
    ) {
        debug!(connection_id = ?connection_id, message = %message, "-> Sending");
        let connections = self.connections.read().await;
        if let Some(connection) = connections.iter().find(|c| c.id == connection_id) {
            let _ = connection.sender.lock().await.send(Message::Text(message.into())).await;
        }
    }
}

fn orphaned_sessions(
    leaving: HashSet<SessionId>,
    remaining: &HashSet<SessionId>,
) -> Vec<SessionId> {
    leaving.into_iter().filter(|id| !remaining.contains(id)).collect()
}

impl Default for WebSocketNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionNotifier for WebSocketNotifier {
    async fn notify(
        &self,
        session_id: SessionId,
        notification: SessionNotification,
    ) {
        let message = match serde_json::to_string(&Outgoing {
            session_id,
            notification: &notification,
        }) {
            Ok(message) => message,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to encode notification");
                return;
            }
        };

        let connections = self.connections.read().await;
        for connection in connections.iter() {
            if !connection.subscriptions.read().await.contains(&session_id) {
                continue;
            }
            debug!(connection_id = ?connection.id, message = %message, "-> Sending");
            let _ = connection
                .sender
                .lock()
                .await
                .send(Message::Text(message.clone().into()))
                .await;
        }
    }
}
