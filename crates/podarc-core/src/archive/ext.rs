//! Filename and extension hints derived from the audio URL.

/// Default extension when the URL path does not carry a usable one.
const DEFAULT_EXTENSION: &str = "mp3";

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Derives the audio file extension from the URL's last path segment.
///
/// Query strings are ignored (the URL is parsed, not string-split). Falls
/// back to `mp3` when the segment has no extension or an implausible one.
pub fn audio_extension(url: &str) -> String {
    let ext = filename_from_url_path(url)
        .as_deref()
        .and_then(|name| name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()))
        .filter(|e| !e.is_empty() && e.len() <= 4 && e.chars().all(|c| c.is_ascii_alphanumeric()));
    ext.unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
