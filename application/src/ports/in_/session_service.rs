use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use domain::money::format_full;
use domain::{
    AccessTier, AdGate, Catalog, ItemId, Persona, SessionAction, SessionConfig, SessionEffect, SessionError,
    SessionId, SessionSnapshot, SessionState,
};

use super::history_service::HistoryService;
use crate::ports::out_::{SessionNotification, SessionNotifier, TickScheduler};

pub type SessionStore = Arc<RwLock<HashMap<SessionId, SessionState>>>;

#[derive(Debug, Error)]
pub enum SessionServiceError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("{persona} requires an unlocked ad gate")]
    PremiumLocked { persona: String },

    #[error(transparent)]
    Rejected(#[from] SessionError),
}

/// Owns the running sessions and routes intents, ticks, and completions.
/// Cloning is cheap; clones share the same sessions.
#[derive(Clone)]
pub struct SessionService {
    sessions: SessionStore,
    catalog: Catalog,
    config: SessionConfig,
    history: HistoryService,
    notifier: Arc<dyn SessionNotifier>,
    scheduler: Arc<dyn TickScheduler>,
}

impl SessionService {
    pub fn new(
        catalog: Catalog,
        config: SessionConfig,
        history: HistoryService,
        notifier: Arc<dyn SessionNotifier>,
        scheduler: Arc<dyn TickScheduler>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            catalog,
            config,
            history,
            notifier,
            scheduler,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Starts a session for `persona`. Premium personas need `gate` to be
    /// unlocked first.
    pub async fn start_session(
        &self,
        persona: Persona,
        gate: AdGate,
    ) -> Result<(SessionId, SessionSnapshot), SessionServiceError> {
        if persona.tier() == AccessTier::Premium && !gate.is_unlocked() {
            return Err(SessionServiceError::PremiumLocked { persona: persona.name });
        }

        let session_id = SessionId::new();
        let (state, effects) = SessionState::launch(persona, self.catalog.clone(), self.config.clone());
        let snapshot = state.snapshot();
        info!(session_id = %session_id, persona = %snapshot.persona_name, net_worth = snapshot.net_worth, "Session started");

        self.sessions.write().await.insert(session_id, state);
        self.process_effects(session_id, effects).await;

        // A zero net worth finishes and is released during launch
        let snapshot = self.snapshot(session_id).await.unwrap_or(snapshot);
        Ok((session_id, snapshot))
    }

    pub async fn buy(
        &self,
        session_id: SessionId,
        item_id: ItemId,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        self.process_action(session_id, SessionAction::Buy(item_id)).await
    }

    pub async fn sell(
        &self,
        session_id: SessionId,
        item_id: ItemId,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        self.process_action(session_id, SessionAction::Sell(item_id)).await
    }

    pub async fn tick(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        self.process_action(session_id, SessionAction::Tick).await
    }

    /// The player confirmed leaving; progress is dropped and nothing is
    /// recorded.
    pub async fn exit(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let snapshot = self.process_action(session_id, SessionAction::Exit).await?;
        self.close(session_id).await;
        Ok(snapshot)
    }

    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(SessionState::snapshot)
            .ok_or(SessionServiceError::SessionNotFound(session_id))
    }

    /// Drops a session from memory and cancels its timer.
    pub async fn close(
        &self,
        session_id: SessionId,
    ) -> bool {
        self.scheduler.cancel(session_id);
        self.sessions.write().await.remove(&session_id).is_some()
    }

    async fn process_action(
        &self,
        session_id: SessionId,
        action: SessionAction,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let result = {
            let mut sessions = self.sessions.write().await;
            let Some(state) = sessions.get_mut(&session_id) else {
                return Err(SessionServiceError::SessionNotFound(session_id));
            };
            state.process_action(action).map(|effects| (effects, state.snapshot()))
        };

        match result {
            Ok((effects, snapshot)) => {
                self.process_effects(session_id, effects).await;
                Ok(snapshot)
            }
            Err(err) => {
                if err.is_user_notice() {
                    let message = notice_message(&err);
                    self.notifier
                        .notify(session_id, SessionNotification::Notice { message })
                        .await;
                } else {
                    debug!(session_id = %session_id, action = ?action, error = %err, "Action rejected");
                }
                Err(err.into())
            }
        }
    }

    async fn process_effects(
        &self,
        session_id: SessionId,
        effects: Vec<SessionEffect>,
    ) {
        let mut completed = false;
        for effect in effects {
            match effect {
                SessionEffect::Notify(event) => {
                    self.notifier.notify(session_id, SessionNotification::Event(event)).await;
                }
                SessionEffect::ScheduleTick { delay } => {
                    let task = self.clone().tick_task(session_id);
                    self.scheduler.schedule(session_id, delay, task);
                }
                SessionEffect::Complete(summary) => {
                    if let Err(e) = self.history.record(summary).await {
                        warn!(session_id = %session_id, error = %e, "Failed to record session");
                    }
                    completed = true;
                }
            }
        }

        // A finished session is only kept for the effects that announce it
        if completed {
            self.close(session_id).await;
            debug!(session_id = %session_id, "Finished session released");
        }
    }

    // Boxed explicitly so the tick -> effects -> tick cycle has a nameable type.
    fn tick_task(
        self,
        session_id: SessionId,
    ) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            if let Err(e) = self.tick(session_id).await {
                debug!(session_id = %session_id, error = %e, "Tick chain stopped");
            }
        })
    }
}

fn notice_message(err: &SessionError) -> String {
    match err {
        SessionError::InsufficientFunds { available, required } => format!(
            "Not enough money: {} left, {} needed",
            format_full(*available),
            format_full(*required)
        ),
        SessionError::NothingToSell { .. } => "You don't own any of that item".to_string(),
        other => other.to_string(),
    }
}
