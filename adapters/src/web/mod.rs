mod http;
mod state;
mod websocket;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};

pub use http::{
    ApiError, CatalogEntry, ItemRequest, StartSessionRequest, StartSessionResponse, buy_item, create_persona,
    delete_all_data, exit_session, get_catalog, get_history, get_profile, get_session, get_top_scores, list_personas,
    sell_item, start_session,
};
pub use state::{AppPorts, AppState, create_app_state};
pub use websocket::{ConnectionId, IncomingMessage, WebSocketNotifier, handle_connection};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/personas", get(list_personas).post(create_persona))
        .route("/sessions", post(start_session))
        .route("/sessions/{id}", get(get_session).delete(exit_session))
        .route("/sessions/{id}/buy", post(buy_item))
        .route("/sessions/{id}/sell", post(sell_item))
        .route("/history", get(get_history))
        .route("/history/top-scores", get(get_top_scores))
        .route("/profile", get(get_profile))
        .route("/data", delete(delete_all_data))
        .route("/ws", get(handle_connection))
        .with_state(state)
}
