//! Path utilities.
//!
//! Paths are plain `/`-separated strings, not `std::path::Path`: the tree is
//! virtual and must behave identically on every host.

/// Normalize a path into a canonical absolute path.
///
/// Empty and `.` segments are dropped, `..` pops the previous segment and is
/// a no-op at the root. The result always starts with a single `/`, never
/// contains `.` or `..`, and never escapes the root.
pub fn sanitize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Resolve `path` against `cwd`, expanding `~` to `home`.
///
/// Absolute paths ignore `cwd` but are still sanitized.
pub fn resolve(cwd: &str, home: &str, path: &str) -> String {
    if path == "~" {
        return sanitize_path(home);
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return sanitize_path(&format!("{home}/{rest}"));
    }
    if path.starts_with('/') {
        sanitize_path(path)
    } else {
        sanitize_path(&format!("{cwd}/{path}"))
    }
}

/// Non-empty segments of a path. `.` and `..` are returned verbatim; callers
/// sanitize first.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Split a path into its parent directory and final segment.
///
/// Returns `None` for the root.
pub fn split_parent(path: &str) -> Option<(String, &str)> {
    let trimmed = path.trim_end_matches('/');
    let (parent, name) = match trimmed.rfind('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    };
    if name.is_empty() {
        return None;
    }
    Some((sanitize_path(parent), name))
}

/// True iff `path` equals `base` or is nested under it, compared segment by
/// segment.
pub fn is_within(path: &str, base: &str) -> bool {
    let mut path_segments = segments(path);
    segments(base).all(|b| path_segments.next() == Some(b))
}
