//! Query string decoding and path segmentation.
//!
//! Shared by the parser (query strings, path normalization) and the route
//! tree (segment splitting), so both sides agree on what a path looks like.

use std::borrow::Cow;
use std::collections::HashMap;

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid escape sequence {0:?}")]
    InvalidEscape(String),

    #[error("decoded value is not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes a query-string component.
///
/// `+` becomes a space and `%XX` becomes the byte `XX`. Unlike a lenient
/// decoder, a `%` that is not followed by two hex digits is an error, as is
/// a decoded byte sequence that is not UTF-8.
///
/// ```
/// # use rye::http::query::percent_decode;
/// assert_eq!(percent_decode("hello%20world").unwrap(), "hello world");
/// assert_eq!(percent_decode("a+b").unwrap(), "a b");
/// assert!(percent_decode("100%").is_err());
/// ```
pub fn percent_decode(input: &str) -> Result<String, QueryError> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'%') {
        let at = pos + offset;
        let valid = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));

        if !valid {
            let escape: String = input[at..].chars().take(3).collect();
            return Err(QueryError::InvalidEscape(escape));
        }

        pos = at + 3;
    }

    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| QueryError::InvalidUtf8)
}

/// Splits a raw query string into decoded `key -> value` pairs.
///
/// Malformed pairs (no `=`, undecodable value) are dropped; they never fail
/// the request. Keys are taken verbatim. Later duplicates overwrite earlier
/// ones.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let Some((key, raw_value)) = pair.split_once('=') else {
            tracing::debug!(pair, "Dropping query parameter without value");
            continue;
        };

        match percent_decode(raw_value) {
            Ok(value) => {
                params.insert(key.to_string(), value);
            }
            Err(e) => {
                tracing::debug!(key, error = %e, "Dropping undecodable query parameter");
            }
        }
    }

    params
}

/// Strips a single trailing `/`, leaving the root path alone.
pub fn normalize_path(path: &str) -> &str {
    if path == "/" {
        return path;
    }

    path.strip_suffix('/').unwrap_or(path)
}

/// Splits a path into its segments.
///
/// The leading `/` and one trailing `/` are ignored, so `/a/b/` and `/a/b`
/// both yield `["a", "b"]`. The root path yields a single empty segment.
pub fn path_segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').collect()
}
