//! Web UI page handler
//!
//! Single page driving the whole workflow: playlist link form, track
//! table, three name buttons, regenerate, and cover generation. Talks to
//! the JSON session API with fetch().

use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::AppState;

/// GET /
///
/// Playlist Refresh landing page
pub async fn root_page() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let build_profile = env!("BUILD_PROFILE");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Refrain - Playlist Refresh</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
        }}
        .header-content {{
            display: flex;
            justify-content: space-between;
            align-items: center;
        }}
        .header-right {{
            text-align: right;
            font-size: 14px;
            color: #888;
            font-family: 'Courier New', monospace;
            line-height: 1.2;
        }}
        h1 {{
            font-size: 26px;
            margin-bottom: 5px;
            color: #4a9eff;
        }}
        .subtitle {{
            color: #888;
            font-size: 16px;
        }}
        .content {{
            padding: 0 20px 40px 20px;
            max-width: 900px;
            margin: 0 auto;
        }}
        h2 {{
            color: #4a9eff;
            margin-top: 25px;
            margin-bottom: 10px;
        }}
        .panel {{
            background: #242424;
            border: 1px solid #3a3a3a;
            border-radius: 6px;
            padding: 20px;
            margin-bottom: 20px;
        }}
        input[type="text"] {{
            width: 100%;
            padding: 10px;
            background: #1a1a1a;
            border: 1px solid #3a3a3a;
            border-radius: 4px;
            color: #e0e0e0;
            font-size: 15px;
            margin-bottom: 10px;
        }}
        .button {{
            display: inline-block;
            padding: 10px 20px;
            background: #4a9eff;
            color: white;
            border: none;
            border-radius: 4px;
            margin: 5px 5px 5px 0;
            font-weight: 600;
            font-size: 14px;
            cursor: pointer;
        }}
        .button:hover {{
            background: #3a8eef;
        }}
        .button:disabled {{
            background: #555;
            cursor: not-allowed;
        }}
        .button.secondary {{
            background: #444;
        }}
        .button.option.selected {{
            background: #10b981;
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
            margin-top: 10px;
        }}
        th, td {{
            text-align: left;
            padding: 6px 10px;
            border-bottom: 1px solid #3a3a3a;
        }}
        th {{
            color: #4a9eff;
        }}
        .error-banner {{
            display: none;
            background: #5b1f1f;
            border: 1px solid #ef4444;
            color: #fecaca;
            border-radius: 4px;
            padding: 10px 14px;
            margin-bottom: 20px;
        }}
        .status-line {{
            color: #10b981;
            margin: 10px 0;
        }}
        .hint {{
            color: #888;
            font-size: 14px;
        }}
        #cover-image {{
            max-width: 100%;
            border-radius: 6px;
            margin-top: 10px;
        }}
        .hidden {{
            display: none;
        }}
    </style>
</head>
<body>
    <header>
        <div class="header-content">
            <div>
                <h1>Refrain &#10024;</h1>
                <p class="subtitle">Playlist names and cover art, refreshed</p>
            </div>
            <div class="header-right">
                <div>refrain-pr v{version}</div>
                <div>{git_hash} ({build_profile})</div>
                <div>{build_timestamp}</div>
            </div>
        </div>
    </header>
    <div class="content">
        <div class="error-banner" id="error-banner"></div>

        <div class="panel">
            <h2>1. Import Your Playlist</h2>
            <p class="hint">
                Paste a link to your public Spotify playlist. Links in this format can be
                found through the Spotify web and desktop app, not the mobile app:
            </p>
            <p class="hint">https://open.spotify.com/playlist/...</p>
            <p class="hint">
                Sample link to try:
                https://open.spotify.com/playlist/51mwSPAk0bqVFM4Lz0IXZ1?si=f6f564a6cc564c89
            </p>
            <input type="text" id="playlist-link" placeholder="Enter Playlist Link">
            <button class="button" id="find-button">Find Playlist &#128270;</button>
        </div>

        <div class="panel hidden" id="tracks-panel">
            <h2 id="playlist-title"></h2>
            <table>
                <thead><tr><th>Song Name</th><th>Artist</th></tr></thead>
                <tbody id="track-rows"></tbody>
            </table>
        </div>

        <div class="panel hidden" id="names-panel">
            <h2>2. Choose a Playlist Name</h2>
            <div id="name-options"></div>
            <button class="button secondary" id="regenerate-button">Regenerate Responses</button>
            <p class="status-line hidden" id="selection-status"></p>
        </div>

        <div class="panel hidden" id="cover-panel">
            <h2>3. Generate Playlist Cover Image</h2>
            <button class="button" id="cover-button">Generate Image</button>
            <div id="cover-holder"></div>
        </div>
    </div>

    <script>
        let sessionId = null;
        let generation = 0;

        const banner = document.getElementById('error-banner');

        function showError(message) {{
            banner.textContent = message;
            banner.style.display = 'block';
        }}

        function clearError() {{
            banner.style.display = 'none';
        }}

        async function callApi(url, body) {{
            const options = {{ method: 'POST' }};
            if (body !== undefined) {{
                options.headers = {{ 'Content-Type': 'application/json' }};
                options.body = JSON.stringify(body);
            }}
            const response = await fetch(url, options);
            const data = await response.json();
            if (!response.ok) {{
                throw new Error(data.error ? data.error.message : 'Request failed');
            }}
            return data;
        }}

        function renderTracks(data) {{
            document.getElementById('playlist-title').textContent =
                data.playlist_name + ' Playlist Refresh';
            const rows = document.getElementById('track-rows');
            rows.innerHTML = '';
            for (const track of data.tracks) {{
                const row = document.createElement('tr');
                const title = document.createElement('td');
                title.textContent = track.title;
                const artist = document.createElement('td');
                artist.textContent = track.artist;
                row.appendChild(title);
                row.appendChild(artist);
                rows.appendChild(row);
            }}
            document.getElementById('tracks-panel').classList.remove('hidden');
        }}

        function renderOptions(data) {{
            generation = data.generation;
            const holder = document.getElementById('name-options');
            holder.innerHTML = '';
            data.options.forEach((name, index) => {{
                const button = document.createElement('button');
                button.className = 'button option';
                button.textContent = name;
                button.addEventListener('click', () => selectName(index + 1, button));
                holder.appendChild(button);
            }});
            document.getElementById('selection-status').classList.add('hidden');
            document.getElementById('cover-panel').classList.add('hidden');
            document.getElementById('names-panel').classList.remove('hidden');
        }}

        async function findPlaylist() {{
            clearError();
            const link = document.getElementById('playlist-link').value;
            try {{
                const data = await callApi('/api/playlist', {{ link: link, session_id: sessionId }});
                sessionId = data.session_id;
                renderTracks(data);
                const names = await callApi('/api/session/' + sessionId + '/suggestions');
                renderOptions(names);
            }} catch (err) {{
                showError(err.message);
            }}
        }}

        async function regenerate() {{
            clearError();
            try {{
                const names = await callApi(
                    '/api/session/' + sessionId + '/suggestions',
                    {{ regenerate: true }}
                );
                renderOptions(names);
            }} catch (err) {{
                showError(err.message);
            }}
        }}

        async function selectName(option, button) {{
            clearError();
            try {{
                const data = await callApi(
                    '/api/session/' + sessionId + '/select',
                    {{ generation: generation, option: option }}
                );
                for (const b of document.querySelectorAll('.button.option')) {{
                    b.classList.remove('selected');
                }}
                button.classList.add('selected');
                const status = document.getElementById('selection-status');
                status.textContent = 'You selected: ' + data.chosen_name;
                status.classList.remove('hidden');
                document.getElementById('cover-panel').classList.remove('hidden');
            }} catch (err) {{
                showError(err.message);
            }}
        }}

        async function generateCover() {{
            clearError();
            const coverButton = document.getElementById('cover-button');
            coverButton.disabled = true;
            try {{
                const data = await callApi('/api/session/' + sessionId + '/cover');
                const holder = document.getElementById('cover-holder');
                holder.innerHTML = '';
                const image = document.createElement('img');
                image.id = 'cover-image';
                image.alt = data.caption;
                image.src = 'data:image/png;base64,' + data.image_base64;
                const caption = document.createElement('p');
                caption.className = 'hint';
                caption.textContent = data.caption;
                holder.appendChild(image);
                holder.appendChild(caption);
            }} catch (err) {{
                showError(err.message);
            }} finally {{
                coverButton.disabled = false;
            }}
        }}

        document.getElementById('find-button').addEventListener('click', findPlaylist);
        document.getElementById('regenerate-button').addEventListener('click', regenerate);
        document.getElementById('cover-button').addEventListener('click', generateCover);
        document.getElementById('playlist-link').addEventListener('keydown', (event) => {{
            if (event.key === 'Enter') findPlaylist();
        }});
    </script>
</body>
</html>"#
    );

    Html(html)
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}
