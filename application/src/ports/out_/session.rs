use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Serialize;

use domain::{SessionEvent, SessionId};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionNotification {
    Event(SessionEvent),
    /// Transient message for the player, e.g. a rejected purchase.
    Notice { message: String },
}

#[async_trait]
pub trait SessionNotifier: Send + Sync {
    async fn notify(
        &self,
        session_id: SessionId,
        notification: SessionNotification,
    );
}

/// Runs a session's next tick after a delay.
pub trait TickScheduler: Send + Sync {
    fn schedule(
        &self,
        session_id: SessionId,
        delay: Duration,
        task: BoxFuture<'static, ()>,
    );

    /// Drops any tick still pending for the session.
    fn cancel(
        &self,
        session_id: SessionId,
    );
}
