//! Prompt construction for the name-suggestion endpoint
//!
//! Pure and deterministic: the same track list always yields the same
//! prompt. The prompt embeds the track list as JSON (insertion order), a
//! fixed creative-naming brief, and a strict output-format instruction
//! demanding exactly three named fields and nothing else.

use crate::models::TrackRecord;
use serde_json::{json, Value};

const NAMING_BRIEF: &str = "Can you suggest creative and catchy names for this playlist that \
captures its feelings, emotions, and overall mood? Use clever wordplay, puns, or literary \
techniques like alliteration or metaphors to make it unique and memorable. The name should be \
general enough to fit all the songs in the playlist, not tied to any specific song.";

const FORMAT_INSTRUCTION: &str = r#"ONLY respond with 3 playlist name suggestions in JSON format. Do not provide any explanations, commentary, or additional text. Use this exact structure for your response:

```json
{
"playlist_name_1": "",
"playlist_name_2": "",
"playlist_name_3": ""
}
```"#;

/// JSON form of the track list as embedded in the prompt:
/// an array of `{"song_name", "artist"}` objects, artists joined with ", ".
pub fn tracks_json(tracks: &[TrackRecord]) -> String {
    let items: Vec<Value> = tracks
        .iter()
        .map(|track| {
            json!({
                "song_name": track.title,
                "artist": track.artist_line(),
            })
        })
        .collect();
    Value::Array(items).to_string()
}

/// Build the full user prompt for a track list.
///
/// An empty track list is valid input and produces a well-formed prompt
/// with an empty JSON array; it is not an error.
pub fn build_prompt(tracks: &[TrackRecord]) -> String {
    format!(
        "Here is the playlist data in JSON format: {}\n\n{}\n\n{}",
        tracks_json(tracks),
        NAMING_BRIEF,
        FORMAT_INSTRUCTION
    )
}
