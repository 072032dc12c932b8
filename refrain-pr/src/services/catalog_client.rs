//! Spotify catalog client
//!
//! Fetches playlist metadata (name + ordered track records) for a public
//! playlist using the client-credentials grant. The bearer token is cached
//! in-process until shortly before expiry; playlist track pages are
//! followed via the `next` cursor so long playlists come back complete.

use crate::models::{PlaylistSnapshot, TrackRecord};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use refrain_common::FetchError;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "Refrain/0.1.0 (https://github.com/refrain/refrain)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Refresh the token this long before its advertised expiry
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Client-credentials token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Playlist lookup response (name plus first page of tracks)
#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    name: String,
    tracks: TracksPage,
}

/// One page of playlist items with the cursor to the next page
#[derive(Debug, Deserialize)]
struct TracksPage {
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

/// Playlist entry; `track` is null for removed or local-only entries
#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
struct CatalogTrack {
    name: String,
    artists: Vec<CatalogArtist>,
}

#[derive(Debug, Deserialize)]
struct CatalogArtist {
    name: String,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Spotify Web API client (client-credentials flow)
pub struct CatalogClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl CatalogClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::transport(e.to_string()))?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            token: Mutex::new(None),
        })
    }

    /// Fetch a full playlist snapshot: display name plus every track in
    /// playlist order.
    pub async fn fetch_playlist(&self, playlist_id: &str) -> Result<PlaylistSnapshot, FetchError> {
        let token = self.access_token().await?;

        let url = format!("{}/playlists/{}", API_BASE_URL, playlist_id);
        tracing::debug!(playlist_id = %playlist_id, "Querying catalog for playlist");

        let playlist: PlaylistResponse = self.get_json(&url, &token).await?;

        let mut tracks = collect_tracks(playlist.tracks.items);

        // Follow the paging cursor until the catalog reports no next page
        let mut next_url = playlist.tracks.next;
        while let Some(url) = next_url {
            let page: TracksPage = self.get_json(&url, &token).await?;
            tracks.extend(collect_tracks(page.items));
            next_url = page.next;
        }

        tracing::info!(
            playlist_id = %playlist_id,
            name = %playlist.name,
            track_count = tracks.len(),
            "Retrieved playlist from catalog"
        );

        Ok(PlaylistSnapshot {
            playlist_id: playlist_id.to_string(),
            name: playlist.name,
            tracks,
        })
    }

    /// Get a valid bearer token, reusing the cached one until near expiry
    async fn access_token(&self) -> Result<String, FetchError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let credential = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .http_client
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {}", credential))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(format!("Token JSON decode failed: {}", e)))?;

        let lifetime = token
            .expires_in
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
            .max(1);

        tracing::debug!(expires_in = token.expires_in, "Catalog access token refreshed");

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(access_token)
    }

    /// Authorized GET with the shared status-code mapping
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(FetchError::status(
                404,
                "Playlist not found. Make sure the playlist is public".to_string(),
            ));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(format!("Catalog JSON decode failed: {}", e)))
    }
}

/// Map catalog playlist items to track records, dropping entries whose
/// track payload is null (removed/local-only songs).
fn collect_tracks(items: Vec<PlaylistItem>) -> Vec<TrackRecord> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| TrackRecord {
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        })
        .collect()
}
