//! Filesystem-safe sanitization of feed and episode titles.

/// Sanitizes a title for use as a single path component.
///
/// - Replaces NUL, `/`, `\`, `:`, `?`, `*`, `"`, `<`, `>`, `|`, and control
///   characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing spaces, dots, and underscores
/// - Limits length to 255 bytes (Linux NAME_MAX)
///
/// The same title always sanitizes to the same component, so archive paths
/// are stable across runs.
pub fn sanitize_component(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char = matches!(c, '\0' | '/' | '\\' | ':' | '?' | '*' | '"' | '<' | '>' | '|')
            || c.is_control();
        let replacement = if unsafe_char { '_' } else { c };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].trim_end_matches(|c| c == ' ' || c == '.' || c == '_').to_string()
    } else {
        trimmed.to_string()
    }
}
