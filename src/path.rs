//! Virtual filesystem path normalization.

/// Normalize a path for embedding in a request URL.
///
/// Every literal `+` is percent-encoded as `%2B` (a bare `+` is ambiguous
/// with a URL-encoded space in query contexts), then a leading `/` is added
/// if not already present. The replacement text contains no `+`, so no `+`
/// can survive the pass.
///
/// # Arguments
/// * `path` - The path to normalize (e.g., "src/main.rs", "/a+b")
pub fn normalize_path(path: &str) -> String {
    let encoded = path.replace('+', "%2B");

    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{}", encoded)
    }
}
