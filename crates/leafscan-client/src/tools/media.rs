//! Upload and audio encoding helpers.

use std::path::Path;

use base64::Engine;

/// Upload MIME type for an image path: PNG by suffix, JPEG otherwise.
pub fn upload_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Ensure an audio locator is an absolute path.
pub fn normalize_audio_path(audio_url: &str) -> String {
    if audio_url.starts_with('/') {
        audio_url.to_string()
    } else {
        format!("/{}", audio_url)
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
