//! Content-Type resolution from file names.

use std::path::Path;

/// Resolve the `Content-Type` for `path` from its extension.
///
/// Textual types carry `; charset=utf-8`. Unknown extensions resolve to an
/// empty string rather than a generic binary type.
pub fn content_type_for(path: &Path) -> String {
    let Some(mime) = mime_guess::from_path(path).first() else {
        return String::new();
    };
    if is_textual(&mime) {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    }
}

fn is_textual(mime: &mime_guess::Mime) -> bool {
    mime.type_() == mime_guess::mime::TEXT
        || matches!(mime.subtype().as_str(), "javascript" | "json")
}
