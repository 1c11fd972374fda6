//! URL sanitizing for tag parameters rendered into links.
//!
//! Templates substitute parameters as text and never call this. It is a
//! helper for embedders that read URLs out of BBCode themselves, for example
//! to post-process links or to pre-clean input before interpretation. The
//! built-in `url` and `img` tags only get the escaping of
//! [`SubstitutionTables`](crate::SubstitutionTables).

/// Schemes passed through unchanged.
const ALLOWED_SCHEMES: &[&str] = &["http://", "https://", "ftp://"];

/// Make a user-supplied URL safe to place in an `href` or `src` attribute.
///
/// Leading whitespace is trimmed. A URL that does not start with an allowed
/// scheme has every `:` removed, which defeats `javascript:` and similar
/// schemes; a URL left without any `:` gets `http://` prefixed.
///
/// # Examples
///
/// ```
/// use bbcode_core::sanitize_url;
///
/// assert_eq!(sanitize_url("  https://example.com"), "https://example.com");
/// assert_eq!(sanitize_url("example.com/a"), "http://example.com/a");
/// assert_eq!(sanitize_url("javascript:alert(1)"), "http://javascriptalert(1)");
/// ```
#[must_use]
pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim_start();

    let mut sanitized = if ALLOWED_SCHEMES.iter().any(|s| trimmed.starts_with(s)) {
        trimmed.to_owned()
    } else {
        trimmed.replace(':', "")
    };

    if !sanitized.contains(':') {
        sanitized.insert_str(0, "http://");
    }

    sanitized
}
