//! Helpers for comparing server URLs that may differ in scheme or trailing slash.

/// Strips the scheme and trailing slashes and lower-cases the host part.
///
/// `https://Chat.Example.com/sub/` and `chat.example.com/sub` normalize to the
/// same key.
pub fn normalize(url: &str) -> String {
    let trimmed = url.trim();
    let without_scheme = match trimmed.find("://") {
        Some(idx) => &trimmed[idx + 3..],
        None => trimmed,
    };
    let without_slash = without_scheme.trim_end_matches('/');

    match without_slash.split_once('/') {
        Some((host, path)) => format!("{}/{}", host.to_lowercase(), path),
        None => without_slash.to_lowercase(),
    }
}

pub fn same_server(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
