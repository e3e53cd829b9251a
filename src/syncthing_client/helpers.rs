use chrono::{DateTime, Utc};

/// Longest slice of an error body kept in error messages.
pub const ERROR_BODY_LIMIT: usize = 512;

/// Parses the timestamp encodings Syncthing emits and normalizes to UTC.
/// Empty or unparseable values yield `None`.
pub fn parse_syncthing_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Trims a response body to at most `limit` bytes on a char boundary.
pub fn truncate_body(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body.trim();
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].trim()
}
