//! Naming workflow state machine
//!
//! A session progresses through 5 defined stages:
//! IDLE → TRACKS_LOADED → SUGGESTIONS_READY → NAME_SELECTED → IMAGE_READY
//!
//! Regeneration loops SUGGESTIONS_READY → SUGGESTIONS_READY, discarding the
//! prior suggestion set and invalidating any selection made against it.
//! Failed fetches never advance the stage; the session stays where it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{PlaylistSnapshot, SuggestionSet};

/// Workflow stage of one naming session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStage {
    /// Session created, no playlist attached yet
    Idle,
    /// Catalog lookup succeeded, tracks available
    TracksLoaded,
    /// A suggestion set is cached and displayable
    SuggestionsReady,
    /// User picked one of the three current options
    NameSelected,
    /// At least one cover image was generated for the selection
    ImageReady,
}

/// Invalid operations against the session state machine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No playlist loaded for this session")]
    NoPlaylist,

    #[error("No name suggestions available yet")]
    NoSuggestions,

    #[error("Suggestions were regenerated; selection no longer valid")]
    StaleSuggestions,

    #[error("Invalid option {0}: must be 1, 2, or 3")]
    InvalidOption(u8),

    #[error("No playlist name selected yet")]
    NoSelection,
}

/// In-memory state for one user's naming workflow.
///
/// Exclusively owned by the session store for its lifetime; nothing here is
/// shared across sessions or written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingSession {
    /// Unique session identifier
    pub session_id: Uuid,

    /// Current workflow stage
    pub stage: SessionStage,

    /// Playlist fetched for this session, if any
    pub snapshot: Option<PlaylistSnapshot>,

    /// Cached suggestion set (valid for the current generation only)
    pub suggestions: Option<SuggestionSet>,

    /// Monotonic counter bumped on every (re)generation; selections carry
    /// the generation they were made against so stale picks are rejected
    pub generation: u64,

    /// The chosen playlist name, if one has been picked
    pub chosen_name: Option<String>,

    /// Session start time
    pub started_at: DateTime<Utc>,
}

impl NamingSession {
    /// Create a fresh idle session
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            stage: SessionStage::Idle,
            snapshot: None,
            suggestions: None,
            generation: 0,
            chosen_name: None,
            started_at: Utc::now(),
        }
    }

    /// Attach a freshly fetched playlist, resetting any prior workflow
    /// state. Idle → TracksLoaded (also used when a session re-analyzes a
    /// different playlist).
    pub fn attach_snapshot(&mut self, snapshot: PlaylistSnapshot) {
        self.snapshot = Some(snapshot);
        self.suggestions = None;
        self.generation = 0;
        self.chosen_name = None;
        self.stage = SessionStage::TracksLoaded;
    }

    /// Cached suggestions with their generation, if present
    pub fn cached_suggestions(&self) -> Option<(&SuggestionSet, u64)> {
        self.suggestions.as_ref().map(|s| (s, self.generation))
    }

    /// Store a new suggestion set, replacing any prior one.
    ///
    /// Bumps the generation and clears the selection: names from the old
    /// set must not survive a regeneration. Returns the new generation.
    pub fn store_suggestions(&mut self, set: SuggestionSet) -> Result<u64, SessionError> {
        if self.snapshot.is_none() {
            return Err(SessionError::NoPlaylist);
        }
        self.suggestions = Some(set);
        self.generation += 1;
        self.chosen_name = None;
        self.stage = SessionStage::SuggestionsReady;
        Ok(self.generation)
    }

    /// Record the user's pick. `option` is 1-based; `generation` must match
    /// the current suggestion set or the pick is rejected as stale.
    /// Re-selection is allowed: the last pick wins.
    pub fn select(&mut self, generation: u64, option: u8) -> Result<&str, SessionError> {
        let suggestions = self.suggestions.as_ref().ok_or(SessionError::NoSuggestions)?;
        if generation != self.generation {
            return Err(SessionError::StaleSuggestions);
        }
        let name = suggestions
            .option(option)
            .ok_or(SessionError::InvalidOption(option))?
            .to_string();
        self.chosen_name = Some(name);
        self.stage = SessionStage::NameSelected;
        Ok(self.chosen_name.as_deref().unwrap_or_default())
    }

    /// The chosen name, required before cover generation
    pub fn chosen_name(&self) -> Result<&str, SessionError> {
        self.chosen_name.as_deref().ok_or(SessionError::NoSelection)
    }

    /// Mark that a cover was generated. Stays in ImageReady on repeated
    /// triggers; each trigger performs a fresh endpoint call upstream.
    pub fn mark_image_ready(&mut self) -> Result<(), SessionError> {
        if self.chosen_name.is_none() {
            return Err(SessionError::NoSelection);
        }
        self.stage = SessionStage::ImageReady;
        Ok(())
    }
}

impl Default for NamingSession {
    fn default() -> Self {
        Self::new()
    }
}
