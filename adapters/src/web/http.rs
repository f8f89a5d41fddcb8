use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use application::ports::in_::{PersonaEntry, PersonaServiceError, SessionServiceError};
use application::ports::out_::StoreError;
use domain::{
    AdGate, ImageRef, ItemId, Persona, PersonaDraft, ProfileStats, SessionError, SessionId, SessionRecord,
    SessionSnapshot, TopScore,
};

use super::state::AppState;

#[derive(Debug)]
pub enum ApiError {
    Session(SessionServiceError),
    Persona(PersonaServiceError),
    Store(StoreError),
}

impl From<SessionServiceError> for ApiError {
    fn from(err: SessionServiceError) -> Self {
        ApiError::Session(err)
    }
}

impl From<PersonaServiceError> for ApiError {
    fn from(err: PersonaServiceError) -> Self {
        ApiError::Persona(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionServiceError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionServiceError::PremiumLocked { .. }) => StatusCode::FORBIDDEN,
            ApiError::Session(SessionServiceError::Rejected(SessionError::UnknownItem(_))) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionServiceError::Rejected(_)) => StatusCode::CONFLICT,
            ApiError::Persona(PersonaServiceError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Persona(PersonaServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Persona(PersonaServiceError::Store(_)) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Session(e) => e.to_string(),
            ApiError::Persona(e) => e.to_string(),
            ApiError::Store(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    item_id: ItemId,
    name: String,
    unit_price: i64,
    image_ref: ImageRef,
}

pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    let entries = state
        .sessions
        .catalog()
        .iter()
        .map(|(item_id, item)| CatalogEntry {
            item_id,
            name: item.name.clone(),
            unit_price: item.unit_price,
            image_ref: item.image_ref.clone(),
        })
        .collect();
    Json(entries)
}

pub async fn list_personas(State(state): State<Arc<AppState>>) -> Json<Vec<PersonaEntry>> {
    Json(state.personas.list_personas().await)
}

pub async fn create_persona(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<PersonaDraft>,
) -> Result<(StatusCode, Json<Persona>), ApiError> {
    let persona = state.personas.create_persona(draft).await?;
    Ok((StatusCode::CREATED, Json(persona)))
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub persona_id: usize,
    #[serde(default)]
    pub bypass_gate: bool,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    session_id: SessionId,
    gate: AdGate,
    snapshot: SessionSnapshot,
}

pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    let entry = state.personas.select_persona(request.persona_id).await?;

    let gate = AdGate::for_persona(&entry.persona);
    let gate = if request.bypass_gate {
        state.ad_gate.bypass(gate)
    } else {
        state.ad_gate.unlock(gate).await
    };

    let (session_id, snapshot) = state.sessions.start_session(entry.persona, gate).await?;
    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id,
            gate,
            snapshot,
        }),
    ))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.sessions.snapshot(SessionId(id)).await?))
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub item: ItemId,
}

pub async fn buy_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.sessions.buy(SessionId(id), request.item).await?))
}

pub async fn sell_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.sessions.sell(SessionId(id), request.item).await?))
}

/// Confirmed exit. An active session is abandoned; one that already finished
/// is just released.
pub async fn exit_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.sessions.exit(SessionId(id)).await?))
}

pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<SessionRecord>> {
    Json(state.history.history().await)
}

pub async fn get_top_scores(State(state): State<Arc<AppState>>) -> Json<Vec<TopScore>> {
    Json(state.history.top_scores().await)
}

pub async fn get_profile(State(state): State<Arc<AppState>>) -> Json<ProfileStats> {
    Json(state.history.profile().await)
}

pub async fn delete_all_data(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.history.clear_all_data().await?;
    info!("Data deleted through the API");
    Ok(StatusCode::NO_CONTENT)
}
