//! HTTP-shaped errors and the default error renderer.
//!
//! Handlers return [`HandlerError`], which is either an [`HttpError`] that
//! already knows its status code and body, or any other failure. The
//! connection handler passes whichever comes out of the chain to the
//! configured error handler; [`default_error_handler`] is used unless the
//! application installs its own.

use crate::http::bind::BindError;
use crate::http::context::Context;
use crate::http::handler::HandlerResult;
use crate::http::response::{MIME_JSON, MIME_TEXT, StatusCode};

/// How an [`HttpError`] body is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// The message as a plain-text body.
    Text,
    /// The message wrapped as `{"error": "<message>"}`.
    Json,
}

/// An error that maps directly onto an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP error {status}: {message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
    body: Vec<u8>,
    kind: BodyKind,
}

impl HttpError {
    /// Creates an error whose message is the reason phrase of `status`.
    ///
    /// ```
    /// # use rye::http::error::{BodyKind, HttpError};
    /// # use rye::http::response::StatusCode;
    /// let err = HttpError::new(StatusCode::UNAUTHORIZED, BodyKind::Json);
    /// assert_eq!(err.body(), br#"{"error": "Unauthorized"}"#);
    /// ```
    pub fn new(status: StatusCode, kind: BodyKind) -> Self {
        Self::with_message(status, status.reason_phrase(), kind)
    }

    pub fn with_message(
        status: StatusCode,
        message: impl Into<String>,
        kind: BodyKind,
    ) -> Self {
        let message = message.into();
        let body = match kind {
            BodyKind::Text => message.clone().into_bytes(),
            BodyKind::Json => {
                // Serializing a string value escapes quotes and control characters.
                let quoted = serde_json::Value::String(message.clone());
                format!("{{\"error\": {quoted}}}").into_bytes()
            }
        };

        Self {
            status,
            message,
            body,
            kind,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Writes this error into the context's response.
    pub fn render(&self, ctx: &mut Context) -> HandlerResult {
        let content_type = match self.kind {
            BodyKind::Text => MIME_TEXT,
            BodyKind::Json => MIME_JSON,
        };

        ctx.bytes(self.status, content_type, self.body.clone())
    }
}

/// Why a handler stopped the chain.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A deliberate HTTP outcome, e.g. 401 from an auth middleware.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Anything else. Rendered as a 500 by the default error handler.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        HandlerError::Other(anyhow::Error::msg(message))
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            HandlerError::Http(e) => Some(e),
            HandlerError::Other(_) => None,
        }
    }
}

impl From<BindError> for HandlerError {
    fn from(e: BindError) -> Self {
        HandlerError::Other(e.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::Other(e.into())
    }
}

/// Renders [`HttpError`]s as themselves and anything else as a plain-text 500
/// carrying the error's own description.
pub fn default_error_handler(err: HandlerError, ctx: &mut Context) -> HandlerResult {
    match err {
        HandlerError::Http(e) => e.render(ctx),
        HandlerError::Other(e) => ctx.string(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
