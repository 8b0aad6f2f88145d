use std::collections::HashMap;
use std::fmt;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";

pub const MIME_TEXT: &str = "text/plain; charset=utf-8";
pub const MIME_HTML: &str = "text/html; charset=utf-8";
pub const MIME_JSON: &str = "application/json";

/// An HTTP status code.
///
/// Any numeric code can be carried; the common ones have named constants.
///
/// # Example
///
/// ```
/// # use rye::http::response::StatusCode;
/// assert_eq!(StatusCode::OK.as_u16(), 200);
/// assert_eq!(StatusCode::from_u16(404), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const MOVED_PERMANENTLY: StatusCode = StatusCode(301);
    pub const FOUND: StatusCode = StatusCode(302);
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const CONFLICT: StatusCode = StatusCode(409);
    pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode(422);
    pub const TOO_MANY_REQUESTS: StatusCode = StatusCode(429);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const NOT_IMPLEMENTED: StatusCode = StatusCode(501);
    pub const BAD_GATEWAY: StatusCode = StatusCode(502);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the standard reason phrase, or `""` for unregistered codes.
    ///
    /// # Example
    ///
    /// ```
    /// # use rye::http::response::StatusCode;
    /// assert_eq!(StatusCode::UNAUTHORIZED.reason_phrase(), "Unauthorized");
    /// assert_eq!(StatusCode::from_u16(599).reason_phrase(), "");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            101 => "Switching Protocols",
            102 => "Processing",
            103 => "Early Hints",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            203 => "Non-Authoritative Information",
            204 => "No Content",
            205 => "Reset Content",
            206 => "Partial Content",
            207 => "Multi-Status",
            208 => "Already Reported",
            226 => "IM Used",
            300 => "Multiple Choices",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            305 => "Use Proxy",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            402 => "Payment Required",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            406 => "Not Acceptable",
            407 => "Proxy Authentication Required",
            408 => "Request Timeout",
            409 => "Conflict",
            410 => "Gone",
            411 => "Length Required",
            412 => "Precondition Failed",
            413 => "Request Entity Too Large",
            414 => "Request URI Too Long",
            415 => "Unsupported Media Type",
            416 => "Requested Range Not Satisfiable",
            417 => "Expectation Failed",
            418 => "I'm a teapot",
            421 => "Misdirected Request",
            422 => "Unprocessable Entity",
            423 => "Locked",
            424 => "Failed Dependency",
            425 => "Too Early",
            426 => "Upgrade Required",
            428 => "Precondition Required",
            429 => "Too Many Requests",
            431 => "Request Header Fields Too Large",
            451 => "Unavailable For Legal Reasons",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            506 => "Variant Also Negotiates",
            507 => "Insufficient Storage",
            508 => "Loop Detected",
            510 => "Not Extended",
            511 => "Network Authentication Required",
            _ => "",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The response a handler chain builds up for one request.
///
/// `status` stays `None` until something sets it; the serializer sends 200
/// in that case. Headers are last-write-wins on the exact name. The headers
/// the serializer owns (`Content-Type` default, `Content-Length`, `Date`,
/// `Connection`) are matched ignoring case, so a handler's `content-type`
/// is never sent alongside a second `Content-Type`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Response {
    /// The HTTP status code, if set
    pub status: Option<StatusCode>,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::OK)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: Some(self.status),
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed response for requests that cannot be parsed.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BAD_REQUEST)
            .body("invalid request")
            .build()
    }

    /// The fixed response when no route matches and no catch-all is set.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NOT_FOUND)
            .body("Path route not found")
            .build()
    }

    /// The last-resort response when the error handler itself fails.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
            .body("Internal Server Error")
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Whether any header is named `key`, ignoring ASCII case.
    pub fn has_header_ignore_case(&self, key: &str) -> bool {
        has_header(&self.headers, key)
    }

    /// Removes every header named `key`, ignoring ASCII case.
    pub fn remove_header_ignore_case(&mut self, key: &str) {
        remove_header(&mut self.headers, key);
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// The status that goes on the wire.
    pub fn status_or_default(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }
}

pub(crate) fn has_header(headers: &HashMap<String, String>, key: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(key))
}

pub(crate) fn remove_header(headers: &mut HashMap<String, String>, key: &str) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
}
