//! Document served for navigations while the network is unreachable.

use bridge_traits::http::FetchResponse;

pub const OFFLINE_TITLE: &str = "SoundScape - Offline";

const OFFLINE_DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>SoundScape - Offline</title>
  <style>
    body { font-family: system-ui, sans-serif; background: #121212; color: #f0f0f0;
           text-align: center; padding: 2rem; display: flex; flex-direction: column;
           justify-content: center; min-height: 100vh; margin: 0; }
    h1 { color: #1db954; }
    button { background: #1db954; color: #fff; border: none; padding: 12px 24px;
             border-radius: 8px; font-size: 16px; cursor: pointer; }
  </style>
</head>
<body>
  <h1>SoundScape</h1>
  <p>You are offline.</p>
  <p>The app works offline once it has been loaded and your audio files are added.</p>
  <button onclick="location.reload()">Retry</button>
</body>
</html>
"#;

/// Minimal HTML page explaining that the app is offline.
pub fn offline_fallback_document() -> FetchResponse {
    FetchResponse::new(200, OFFLINE_DOCUMENT).header("Content-Type", "text/html; charset=utf-8")
}
