use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::AbortHandle;
use tracing::debug;

use application::ports::out_::TickScheduler;
use domain::SessionId;

/// Spawns each tick on the tokio runtime after its delay. At most one tick is
/// pending per session; scheduling again replaces the handle of the tick that
/// is currently running.
pub struct TokioTickScheduler {
    pending: Mutex<HashMap<SessionId, AbortHandle>>,
}

impl TokioTickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for TokioTickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(
        &self,
        session_id: SessionId,
        delay: Duration,
        task: BoxFuture<'static, ()>,
    ) {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|_, handle| !handle.is_finished());
        pending.insert(session_id, handle.abort_handle());
    }

    fn cancel(
        &self,
        session_id: SessionId,
    ) {
        let handle = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id);

        if let Some(handle) = handle {
            debug!(session_id = %session_id, "Tick cancelled");
            handle.abort();
        }
    }
}
