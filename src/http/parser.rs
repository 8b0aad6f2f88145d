use crate::http::query::{normalize_path, parse_query};
use crate::http::request::{Method, Request};
use std::collections::HashMap;

/// The only protocol token accepted on the request line.
pub const HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty request")]
    Empty,

    #[error("request head is not valid UTF-8")]
    InvalidEncoding,

    #[error("invalid request line {0:?}")]
    InvalidRequest(String),

    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid request target {0:?}")]
    InvalidPath(String),

    #[error("unsupported HTTP version {0:?}")]
    UnsupportedVersion(String),

    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    #[error("invalid Content-Length header value {0:?}")]
    InvalidContentLength(String),

    #[error("request body not expected without Content-Length")]
    UnexpectedBody,

    #[error("incomplete body: expected {expected} bytes, got {actual}")]
    Incomplete { expected: usize, actual: usize },

    #[error("body length higher than expected: expected {expected} bytes, got {actual}")]
    BodyTooLong { expected: usize, actual: usize },
}

/// Parses one complete HTTP/1.1 request.
///
/// The buffer must hold the whole request: the body is whatever follows the
/// first blank line, and it has to match `Content-Length` exactly.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    // Look for header/body separator
    let (header_bytes, body_bytes) = match find_headers_end(buf) {
        Some(end) => (&buf[..end], &buf[end + 4..]),
        None => (buf, &[][..]),
    };

    let head = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = head.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line.trim().split(' ').collect();
    let [method_str, target, version] = parts[..] else {
        return Err(ParseError::InvalidRequest(request_line.to_string()));
    };

    let method = Method::from_str(method_str)
        .ok_or_else(|| ParseError::InvalidMethod(method_str.to_string()))?;

    if !target.starts_with('/') {
        return Err(ParseError::InvalidPath(target.to_string()));
    }

    if version != HTTP_VERSION {
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }

    let (raw_path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let path = normalize_path(raw_path).to_string();
    let query_params = query.map(parse_query).unwrap_or_default();

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;

        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    // Body
    check_content_length(headers.get("Content-Length"), body_bytes.len())?;

    Ok(Request {
        method,
        path,
        headers,
        query_params,
        path_params: HashMap::new(),
        body: body_bytes.to_vec(),
    })
}

fn check_content_length(header: Option<&String>, actual: usize) -> Result<(), ParseError> {
    let Some(value) = header else {
        if actual > 0 {
            return Err(ParseError::UnexpectedBody);
        }
        return Ok(());
    };

    let expected = value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidContentLength(value.clone()))?;

    if actual < expected {
        return Err(ParseError::Incomplete { expected, actual });
    }

    if actual > expected {
        return Err(ParseError::BodyTooLong { expected, actual });
    }

    Ok(())
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
