//! Session workflow tests over the HTTP API
//!
//! Seeds sessions directly into the store so the selection and staging
//! rules can be exercised end-to-end without reaching any hosted endpoint.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use refrain_common::config::ServiceConfig;
use refrain_pr::models::{NamingSession, PlaylistSnapshot, SessionStage, SuggestionSet, TrackRecord};
use refrain_pr::services::NamingOrchestrator;
use refrain_pr::{build_router, AppState, MAX_SESSIONS};

fn test_app_state() -> AppState {
    let config = ServiceConfig {
        listen_port: 0,
        log_level: "info".to_string(),
        spotify_client_id: "test-client-id".to_string(),
        spotify_client_secret: "test-client-secret".to_string(),
        naming_endpoint: "https://naming.invalid/predict".to_string(),
        naming_api_key: "test-naming-key".to_string(),
        cover_endpoint: "https://cover.invalid/predict".to_string(),
        cover_api_key: "test-cover-key".to_string(),
    };
    let orchestrator = NamingOrchestrator::from_config(&config).unwrap();
    AppState::new(orchestrator)
}

/// Insert a session that already has suggestions; returns (id, generation)
async fn seed_session_with_suggestions(state: &AppState) -> (Uuid, u64) {
    let mut session = NamingSession::new();
    session.attach_snapshot(PlaylistSnapshot {
        playlist_id: "51mwSPAk0bqVFM4Lz0IXZ1".to_string(),
        name: "Road Trip".to_string(),
        tracks: vec![TrackRecord {
            title: "A".to_string(),
            artists: vec!["X".to_string()],
        }],
    });
    let generation = session
        .store_suggestions(SuggestionSet {
            playlist_name_1: "Dusk Drive".to_string(),
            playlist_name_2: "Neon Roads".to_string(),
            playlist_name_3: "Midnight Mixtape".to_string(),
        })
        .unwrap();

    let id = session.session_id;
    state.sessions.write().await.insert(id, session);
    (id, generation)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn selecting_a_current_option_succeeds() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    let response = build_router(state.clone())
        .oneshot(post_json(
            &format!("/api/session/{}/select", id),
            json!({"generation": generation, "option": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["chosen_name"], "Neon Roads");

    let sessions = state.sessions.read().await;
    assert_eq!(sessions[&id].stage, SessionStage::NameSelected);
}

#[tokio::test]
async fn stale_generation_selection_is_a_conflict() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    // Simulate a regeneration happening after the page rendered
    {
        let mut sessions = state.sessions.write().await;
        sessions
            .get_mut(&id)
            .unwrap()
            .store_suggestions(SuggestionSet {
                playlist_name_1: "New One".to_string(),
                playlist_name_2: "New Two".to_string(),
                playlist_name_3: "New Three".to_string(),
            })
            .unwrap();
    }

    let response = build_router(state.clone())
        .oneshot(post_json(
            &format!("/api/session/{}/select", id),
            json!({"generation": generation, "option": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "STALE_SUGGESTIONS");

    // Session unchanged: still awaiting a valid selection
    let sessions = state.sessions.read().await;
    assert_eq!(sessions[&id].stage, SessionStage::SuggestionsReady);
    assert!(sessions[&id].chosen_name.is_none());
}

#[tokio::test]
async fn out_of_range_option_is_a_bad_request() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    let response = build_router(state)
        .oneshot(post_json(
            &format!("/api/session/{}/select", id),
            json!({"generation": generation, "option": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cover_before_selection_is_a_conflict() {
    let state = test_app_state();
    let (id, _) = seed_session_with_suggestions(&state).await;

    let response = build_router(state.clone())
        .oneshot(post_json(&format!("/api/session/{}/cover", id), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "WRONG_STAGE");

    // Failure left the session where it was
    let sessions = state.sessions.read().await;
    assert_eq!(sessions[&id].stage, SessionStage::SuggestionsReady);
}

#[tokio::test]
async fn session_state_view_is_idempotent() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    for _ in 0..2 {
        let response = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/api/session/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["stage"], "SUGGESTIONSREADY");
        assert_eq!(body["playlist_name"], "Road Trip");
        assert_eq!(body["generation"], generation);
        assert_eq!(body["options"][0], "Dusk Drive");
    }
}

#[tokio::test]
async fn failed_suggestion_fetch_leaves_session_intact() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    // Regeneration reaches for the (unresolvable) endpoint and fails with
    // an upstream error; the cached set and stage must survive.
    let response = build_router(state.clone())
        .oneshot(post_json(
            &format!("/api/session/{}/suggestions", id),
            json!({"regenerate": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    let sessions = state.sessions.read().await;
    assert_eq!(sessions[&id].stage, SessionStage::SuggestionsReady);
    assert_eq!(sessions[&id].generation, generation);
    assert_eq!(
        sessions[&id].suggestions.as_ref().unwrap().playlist_name_1,
        "Dusk Drive"
    );

    // The failure is visible in /health diagnostics
    assert!(state.last_error.read().await.is_some());
}

#[tokio::test]
async fn cached_suggestions_are_served_without_refetch() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    // Without regenerate this must serve the cache; a refetch would fail
    // against the unresolvable endpoint.
    let response = build_router(state)
        .oneshot(post_json(
            &format!("/api/session/{}/suggestions", id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["generation"], generation);
    assert_eq!(
        body["options"],
        json!(["Dusk Drive", "Neon Roads", "Midnight Mixtape"])
    );
}

#[tokio::test]
async fn reanalyzing_a_session_replaces_it_in_the_store() {
    let state = test_app_state();
    let (id, _) = seed_session_with_suggestions(&state).await;

    // A second lookup on the same session: the handler clones the stored
    // session, attaches the new snapshot, and stores it back under the
    // same id. The store must not grow and the prior workflow state must
    // be gone.
    let mut session = state.sessions.read().await.get(&id).cloned().unwrap();
    session.attach_snapshot(PlaylistSnapshot {
        playlist_id: "0000000000000000000000".to_string(),
        name: "Second Playlist".to_string(),
        tracks: vec![],
    });
    state.store_session(session).await;

    let sessions = state.sessions.read().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[&id].stage, SessionStage::TracksLoaded);
    assert_eq!(sessions[&id].snapshot.as_ref().unwrap().name, "Second Playlist");
    assert!(sessions[&id].suggestions.is_none());
    assert!(sessions[&id].chosen_name.is_none());
}

#[tokio::test]
async fn reanalyze_failure_leaves_the_quoted_session_alone() {
    let state = test_app_state();
    let (id, generation) = seed_session_with_suggestions(&state).await;

    // A bad link quoted against an existing session is rejected before
    // anything touches the store.
    let response = build_router(state.clone())
        .oneshot(post_json(
            "/api/playlist",
            json!({"link": "not a playlist link", "session_id": id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let sessions = state.sessions.read().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[&id].stage, SessionStage::SuggestionsReady);
    assert_eq!(sessions[&id].generation, generation);
}

#[tokio::test]
async fn session_store_evicts_the_oldest_beyond_the_cap() {
    let state = test_app_state();

    let mut first_id = None;
    for i in 0..(MAX_SESSIONS + 3) {
        let mut session = NamingSession::new();
        session.started_at = chrono::Utc::now() + chrono::Duration::seconds(i as i64);
        if first_id.is_none() {
            first_id = Some(session.session_id);
        }
        let last_id = session.session_id;
        state.store_session(session).await;

        // The most recently stored session always survives
        assert!(state.sessions.read().await.contains_key(&last_id));
    }

    let sessions = state.sessions.read().await;
    assert_eq!(sessions.len(), MAX_SESSIONS);
    assert!(!sessions.contains_key(&first_id.unwrap()));
}
