//! Session workflow API
//!
//! One session per analyzed playlist. Handlers operate on a cloned copy of
//! the session and write it back only after the orchestrated call
//! succeeds, so a failed fetch always leaves the stored session in its
//! prior valid stage.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NamingSession, SessionStage};
use crate::services::extract_playlist_id;
use crate::{ApiError, ApiResult, AppState};

/// Request payload for analyzing a playlist
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Share link from the Spotify web/desktop app, or a bare playlist id
    pub link: String,
    /// Existing session to reuse; its prior workflow state is discarded
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// One track row for display
#[derive(Debug, Serialize)]
pub struct TrackView {
    pub title: String,
    /// Artist credits joined with ", "
    pub artist: String,
}

/// Response payload after a successful playlist lookup
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub session_id: Uuid,
    pub playlist_name: String,
    pub tracks: Vec<TrackView>,
}

/// Request payload for the suggestions endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsRequest {
    /// Discard the cached set and fetch a fresh one
    #[serde(default)]
    pub regenerate: bool,
}

/// Response payload carrying the current suggestion set
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    /// Generation counter; selections must quote it back
    pub generation: u64,
    /// The three candidate names in presentation order
    pub options: Vec<String>,
}

/// Request payload for selecting a name
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Generation the user was shown
    pub generation: u64,
    /// 1-based option index
    pub option: u8,
}

/// Response payload after a selection
#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub chosen_name: String,
}

/// Response payload carrying a generated cover image
#[derive(Debug, Serialize)]
pub struct CoverResponse {
    pub caption: String,
    /// Image bytes, base64-encoded for the JSON wire
    pub image_base64: String,
}

/// Current state of a session, for idempotent display
#[derive(Debug, Serialize)]
pub struct SessionStateResponse {
    pub session_id: Uuid,
    pub stage: SessionStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_name: Option<String>,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_name: Option<String>,
}

/// POST /api/playlist
///
/// Validates the link, fetches the playlist, and opens a session. When the
/// caller quotes an existing `session_id`, that session is reused for the
/// new playlist instead of adding a second entry to the store.
/// A malformed link is rejected before any catalog call and no session is
/// created for it.
pub async fn analyze_playlist(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let playlist_id = extract_playlist_id(&payload.link).map_err(|e| {
        warn!("Rejected playlist link: {}", e);
        ApiError::from(e)
    })?;

    // Unknown ids (server restart, stale tab) just start fresh
    let mut session = match payload.session_id {
        Some(id) => state
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default(),
        None => NamingSession::new(),
    };
    let snapshot = match state
        .orchestrator
        .load_playlist(&mut session, &playlist_id)
        .await
    {
        Ok(snapshot) => snapshot,
        Err(e) => return Err(fail(&state, e).await),
    };

    let session_id = session.session_id;
    state.store_session(session).await;

    info!(
        session_id = %session_id,
        playlist = %snapshot.name,
        tracks = snapshot.tracks.len(),
        "Playlist analyzed, session opened"
    );

    Ok(Json(AnalyzeResponse {
        session_id,
        playlist_name: snapshot.name.clone(),
        tracks: snapshot
            .tracks
            .iter()
            .map(|t| TrackView {
                title: t.title.clone(),
                artist: t.artist_line(),
            })
            .collect(),
    }))
}

/// POST /api/session/:id/suggestions
///
/// Returns the cached suggestion set, fetching from the generation
/// endpoint only on first call or when `regenerate` is set.
pub async fn fetch_suggestions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: Option<Json<SuggestionsRequest>>,
) -> ApiResult<Json<SuggestionsResponse>> {
    let regenerate = payload.map(|Json(p)| p.regenerate).unwrap_or(false);

    let mut session = lookup_session(&state, session_id).await?;

    let (set, generation) = match state
        .orchestrator
        .suggest_names(&mut session, regenerate)
        .await
    {
        Ok(result) => result,
        Err(e) => return Err(fail(&state, e).await),
    };

    state.store_session(session).await;

    info!(session_id = %session_id, generation, regenerate, "Suggestions ready");

    Ok(Json(SuggestionsResponse {
        generation,
        options: set.options().map(str::to_string).to_vec(),
    }))
}

/// POST /api/session/:id/select
///
/// Records the user's pick. The quoted generation must match the current
/// suggestion set; picks against a regenerated-away set are rejected.
pub async fn select_name(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SelectRequest>,
) -> ApiResult<Json<SelectResponse>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown session {}", session_id)))?;

    let chosen_name = session
        .select(payload.generation, payload.option)?
        .to_string();

    info!(session_id = %session_id, chosen = %chosen_name, "Playlist name selected");

    Ok(Json(SelectResponse { chosen_name }))
}

/// POST /api/session/:id/cover
///
/// Generates a fresh cover image for the chosen name. Repeated calls
/// produce new images; nothing is cached across triggers.
pub async fn generate_cover(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<CoverResponse>> {
    let mut session = lookup_session(&state, session_id).await?;

    let image = match state.orchestrator.generate_cover(&mut session).await {
        Ok(image) => image,
        Err(e) => return Err(fail(&state, e).await),
    };

    state.store_session(session).await;

    Ok(Json(CoverResponse {
        caption: image.caption,
        image_base64: BASE64.encode(&image.bytes),
    }))
}

/// GET /api/session/:id
///
/// Idempotent view of the session for page refreshes; never triggers an
/// outbound call.
pub async fn session_state(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionStateResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown session {}", session_id)))?;

    Ok(Json(SessionStateResponse {
        session_id: session.session_id,
        stage: session.stage,
        playlist_name: session.snapshot.as_ref().map(|s| s.name.clone()),
        generation: session.generation,
        options: session
            .suggestions
            .as_ref()
            .map(|s| s.options().map(str::to_string).to_vec()),
        chosen_name: session.chosen_name.clone(),
    }))
}

/// Clone the session out of the store (404 when absent). Callers write the
/// mutated copy back only after their orchestrated call succeeds.
async fn lookup_session(state: &AppState, session_id: Uuid) -> Result<NamingSession, ApiError> {
    state
        .sessions
        .read()
        .await
        .get(&session_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Unknown session {}", session_id)))
}

/// Record the failure for /health diagnostics, then convert it
async fn fail<E: Into<ApiError> + std::fmt::Display>(state: &AppState, err: E) -> ApiError {
    warn!("Workflow call failed: {}", err);
    state.record_error(&err.to_string()).await;
    err.into()
}

/// Build session workflow routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/playlist", post(analyze_playlist))
        .route("/api/session/:id", get(session_state))
        .route("/api/session/:id/suggestions", post(fetch_suggestions))
        .route("/api/session/:id/select", post(select_name))
        .route("/api/session/:id/cover", post(generate_cover))
}
