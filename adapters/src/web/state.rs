use std::sync::Arc;

use application::PersistenceGateway;
use application::ports::in_::{AdGateService, HistoryService, PersonaRegistry, SessionService};
use application::ports::out_::{AdProvider, AsyncTimer, Clock, KeyValueStore, SessionNotifier, TickScheduler};
use domain::{Catalog, RetryPolicy, SessionConfig};

use super::websocket::WebSocketNotifier;

pub struct AppState {
    pub notifier: Arc<WebSocketNotifier>,
    pub sessions: SessionService,
    pub personas: PersonaRegistry,
    pub history: HistoryService,
    pub ad_gate: AdGateService,
}

/// Outbound ports the web surface is wired against.
pub struct AppPorts {
    pub store: Arc<dyn KeyValueStore>,
    pub ads: Arc<dyn AdProvider>,
    pub timer: Arc<dyn AsyncTimer>,
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn TickScheduler>,
    pub ad_placement: String,
}

pub fn create_app_state(ports: AppPorts) -> Arc<AppState> {
    let notifier = Arc::new(WebSocketNotifier::new());
    let gateway = PersistenceGateway::new(ports.store);
    let history = HistoryService::new(gateway.clone(), ports.clock);

    let session_notifier: Arc<dyn SessionNotifier> = notifier.clone();
    let sessions = SessionService::new(
        Catalog::standard(),
        SessionConfig::default(),
        history.clone(),
        session_notifier,
        ports.scheduler,
    );

    Arc::new(AppState {
        notifier,
        sessions,
        personas: PersonaRegistry::new(gateway),
        history,
        ad_gate: AdGateService::new(ports.ads, ports.timer, RetryPolicy::default(), ports.ad_placement),
    })
}
