//! Naming workflow orchestrator
//!
//! Owns the three outbound clients and sequences the session workflow:
//! catalog lookup → prompt → suggestions → selection → cover image. All
//! calls are synchronous-sequential with a single attempt each; a failed
//! call surfaces its error and leaves the session in its prior stage.

use crate::models::{CoverImage, NamingSession, PlaylistSnapshot, SessionError, SuggestionSet};
use crate::services::catalog_client::CatalogClient;
use crate::services::cover_client::CoverClient;
use crate::services::prompt_builder::build_prompt;
use crate::services::suggestion_client::SuggestionClient;
use refrain_common::config::ServiceConfig;
use refrain_common::FetchError;
use thiserror::Error;

/// Failures surfaced by orchestrated operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Outbound call failed (transport or malformed response)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Operation not valid for the session's current stage
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Sequences the naming workflow over the three hosted collaborators
pub struct NamingOrchestrator {
    catalog: CatalogClient,
    suggestions: SuggestionClient,
    cover: CoverClient,
}

impl NamingOrchestrator {
    /// Build all clients from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, FetchError> {
        Ok(Self {
            catalog: CatalogClient::new(
                config.spotify_client_id.clone(),
                config.spotify_client_secret.clone(),
            )?,
            suggestions: SuggestionClient::new(
                config.naming_endpoint.clone(),
                config.naming_api_key.clone(),
            )?,
            cover: CoverClient::new(
                config.cover_endpoint.clone(),
                config.cover_api_key.clone(),
            )?,
        })
    }

    /// Fetch the playlist and attach it to the session.
    ///
    /// The session is only mutated after a successful fetch; a failure
    /// leaves whatever was loaded before untouched.
    pub async fn load_playlist(
        &self,
        session: &mut NamingSession,
        playlist_id: &str,
    ) -> Result<PlaylistSnapshot, PipelineError> {
        let snapshot = self.catalog.fetch_playlist(playlist_id).await?;
        session.attach_snapshot(snapshot.clone());
        Ok(snapshot)
    }

    /// Return the current suggestion set, fetching only when needed.
    ///
    /// With `regenerate` false this is idempotent display: a cached set is
    /// returned without another endpoint call. With `regenerate` true the
    /// cached set is discarded and replaced, invalidating any selection.
    pub async fn suggest_names(
        &self,
        session: &mut NamingSession,
        regenerate: bool,
    ) -> Result<(SuggestionSet, u64), PipelineError> {
        if !regenerate {
            if let Some((set, generation)) = session.cached_suggestions() {
                return Ok((set.clone(), generation));
            }
        }

        let tracks = session
            .snapshot
            .as_ref()
            .ok_or(SessionError::NoPlaylist)?
            .tracks
            .clone();

        let prompt = build_prompt(&tracks);
        let set = self.suggestions.fetch_suggestions(&prompt).await?;
        let generation = session.store_suggestions(set.clone())?;

        Ok((set, generation))
    }

    /// Generate a fresh cover image for the session's chosen name.
    ///
    /// Deliberately uncached: the user may want a different image for the
    /// same name, so every trigger performs a new endpoint call.
    pub async fn generate_cover(
        &self,
        session: &mut NamingSession,
    ) -> Result<CoverImage, PipelineError> {
        let name = session.chosen_name()?.to_string();
        let image = self.cover.fetch_cover(&name).await?;
        session.mark_image_ready()?;
        Ok(image)
    }
}
