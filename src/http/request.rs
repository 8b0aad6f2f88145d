use std::collections::HashMap;
use std::fmt;

/// The request methods the parser accepts, and nothing else.
///
/// Any other token on the request line is rejected with
/// [`ParseError::InvalidMethod`].
///
/// [`ParseError::InvalidMethod`]: crate::http::parser::ParseError::InvalidMethod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
}

/// A parsed HTTP request.
///
/// Everything except `path_params` is filled in by the parser and left
/// untouched afterwards. `path_params` is populated by the connection
/// handler once the route tree has matched the path.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Normalized path: no query string, no trailing `/` except for the root
    pub path: String,
    /// Request headers, names kept exactly as sent
    pub headers: HashMap<String, String>,
    /// Decoded query parameters
    pub query_params: HashMap<String, String>,
    /// Parameters bound by the route tree, e.g. `id` for `/users/{id}`
    pub path_params: HashMap<String, String>,
    /// Raw request body
    pub body: Vec<u8>,
}

/// Assembles a [`Request`] by hand, mostly for tests and tools that skip
/// the parser.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    headers: HashMap<String, String>,
    query_params: HashMap<String, String>,
    path_params: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::PATCH,
    ];

    /// Looks up a method token. Matching is case-sensitive, as on the wire.
    ///
    /// ```
    /// # use rye::http::request::Method;
    /// assert_eq!(Method::from_str("PATCH"), Some(Method::PATCH));
    /// assert_eq!(Method::from_str("patch"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Fails only when the method or the path was never set.
    pub fn build(self) -> Result<Request, &'static str> {
        let (Some(method), Some(path)) = (self.method, self.path) else {
            return Err(if self.method.is_none() {
                "method missing"
            } else {
                "path missing"
            });
        };

        Ok(Request {
            method,
            path,
            headers: self.headers,
            query_params: self.query_params,
            path_params: self.path_params,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by its exact name.
    ///
    /// Header names are not canonicalized, so `host` and `Host` are distinct.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(|v| v.as_str())
    }

    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params.get(key).map(|v| v.as_str())
    }
}
