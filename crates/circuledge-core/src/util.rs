//! Small helpers shared by the store, the server and its clients.

/// Longest error body echoed back to a user
const MESSAGE_MAX_CHARS: usize = 180;

/// Trim optional text, treating blank values as absent.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Validate and normalize a server base URL.
///
/// Accepts `http://` and `https://` only and strips trailing slashes so
/// paths can be appended with `format!("{base}/api/...")`.
pub fn normalize_base_url(value: &str) -> Option<String> {
    let value = value.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .filter_map(|scheme| value.strip_prefix(scheme))
        .any(|rest| !rest.is_empty());
    has_host.then(|| value.to_string())
}

/// Shorten a server response body for inclusion in an error message.
pub fn compact_message(value: &str) -> String {
    value.trim().chars().take(MESSAGE_MAX_CHARS).collect()
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
