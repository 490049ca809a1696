//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Make an identifier safe to use as a single storage path segment.
///
/// Dots and path separators become underscores, so `"j.doe"` is stored
/// under `"j_doe"`.
pub fn storage_key(id: &str) -> String {
    id.trim()
        .chars()
        .map(|c| match c {
            '.' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
