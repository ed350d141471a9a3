//! Request path helpers for static mounts.

/// Replace the mount's `base_url` prefix of `request_path` with `.`.
///
/// The prefix only matches on a segment boundary. Other paths are returned
/// unchanged; the sandbox decides whether they are servable.
pub fn strip_base_url(base_url: &str, request_path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        return format!(".{}", prefixed(request_path));
    }
    match request_path.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!(".{rest}"),
        _ => request_path.to_string(),
    }
}

fn prefixed(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
