//! Playlist link validation and identifier extraction
//!
//! Accepts the share link shape produced by the Spotify web/desktop apps
//! (`https://open.spotify.com/playlist/<id>?si=...`) or a bare identifier.
//! Anything else is rejected before any network call is made.

use refrain_common::Error;

const PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";

/// Spotify ids are 22 base62 characters
const PLAYLIST_ID_LEN: usize = 22;

/// Extract the playlist identifier from a share link or bare id.
///
/// Returns `Error::InvalidInput` with user-facing guidance for anything
/// that does not match the known link shape.
pub fn extract_playlist_id(input: &str) -> Result<String, Error> {
    let input = input.trim();

    if input.is_empty() {
        return Err(Error::InvalidInput(
            "Please enter a playlist link to analyze".to_string(),
        ));
    }

    let candidate = match input.strip_prefix(PLAYLIST_URL_PREFIX) {
        // Link form: id is the fixed-width segment before any query string
        Some(rest) => rest.split(['?', '/']).next().unwrap_or(""),
        // Bare id form
        None => input,
    };

    if candidate.len() == PLAYLIST_ID_LEN && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(candidate.to_string())
    } else {
        Err(Error::InvalidInput(format!(
            "Unrecognized playlist link. Expected {}... as shared from the Spotify web or desktop app",
            PLAYLIST_URL_PREFIX
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_share_link_with_query() {
        let id = extract_playlist_id(
            "https://open.spotify.com/playlist/51mwSPAk0bqVFM4Lz0IXZ1?si=f6f564a6cc564c89",
        )
        .unwrap();
        assert_eq!(id, "51mwSPAk0bqVFM4Lz0IXZ1");
    }

    #[test]
    fn extracts_id_from_link_without_query() {
        let id =
            extract_playlist_id("https://open.spotify.com/playlist/51mwSPAk0bqVFM4Lz0IXZ1").unwrap();
        assert_eq!(id, "51mwSPAk0bqVFM4Lz0IXZ1");
    }

    #[test]
    fn accepts_bare_identifier() {
        let id = extract_playlist_id("51mwSPAk0bqVFM4Lz0IXZ1").unwrap();
        assert_eq!(id, "51mwSPAk0bqVFM4Lz0IXZ1");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = extract_playlist_id("  51mwSPAk0bqVFM4Lz0IXZ1\n").unwrap();
        assert_eq!(id, "51mwSPAk0bqVFM4Lz0IXZ1");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(extract_playlist_id("").is_err());
        assert!(extract_playlist_id("   ").is_err());
    }

    #[test]
    fn rejects_wrong_length_id() {
        assert!(extract_playlist_id("51mwSPAk0bq").is_err());
        assert!(extract_playlist_id("https://open.spotify.com/playlist/tooShort").is_err());
    }

    #[test]
    fn rejects_other_link_shapes() {
        assert!(extract_playlist_id("https://open.spotify.com/album/51mwSPAk0bqVFM4Lz0IXZ1").is_err());
        assert!(extract_playlist_id("http://open.spotify.com/playlist/51mwSPAk0bqVFM4Lz0IXZ1").is_err());
        assert!(extract_playlist_id("spotify:playlist:51mwSPAk0bqVFM4Lz0IXZ1").is_err());
    }

    #[test]
    fn rejects_non_base62_characters() {
        assert!(extract_playlist_id("51mwSPAk0bqVFM4Lz0IX_1").is_err());
    }
}
