//! Data model for the playlist naming workflow

pub mod session;

pub use session::{NamingSession, SessionError, SessionStage};

use serde::{Deserialize, Serialize};

/// One track of a playlist: title plus ordered artist credits.
///
/// Produced by the catalog client, consumed by the prompt builder and the
/// track table in the UI. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Song title
    pub title: String,
    /// Artist names in credit order
    pub artists: Vec<String>,
}

impl TrackRecord {
    /// Artist credits joined for display and prompting ("Y, Z")
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Everything fetched for one playlist lookup. Session-scoped, never
/// persisted; discarded when the user analyzes a different playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    /// Catalog identifier (22-char base62 Spotify id)
    pub playlist_id: String,
    /// Playlist display name from the catalog
    pub name: String,
    /// Tracks in playlist order
    pub tracks: Vec<TrackRecord>,
}

/// Three candidate playlist names from one generation call.
///
/// Only ever constructed when all three fields parsed; a response missing
/// any of them is rejected whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub playlist_name_1: String,
    pub playlist_name_2: String,
    pub playlist_name_3: String,
}

impl SuggestionSet {
    /// Options in presentation order
    pub fn options(&self) -> [&str; 3] {
        [
            &self.playlist_name_1,
            &self.playlist_name_2,
            &self.playlist_name_3,
        ]
    }

    /// Option by 1-based index, None when out of range
    pub fn option(&self, index: u8) -> Option<&str> {
        match index {
            1 => Some(&self.playlist_name_1),
            2 => Some(&self.playlist_name_2),
            3 => Some(&self.playlist_name_3),
            _ => None,
        }
    }
}

/// Generated cover art for a chosen name. Ephemeral: a fresh image is
/// produced on every trigger, never cached across selections.
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// Decoded image bytes (PNG/JPEG as produced by the endpoint)
    pub bytes: Vec<u8>,
    /// The chosen playlist name the image was generated for
    pub caption: String,
}
