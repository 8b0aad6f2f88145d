use std::fmt;
use std::sync::Arc;

use crate::http::context::Context;
use crate::http::error::HandlerError;

pub type HandlerResult = Result<(), HandlerError>;

/// One request-processing step: a middleware or the terminal handler.
pub type Handler = Arc<dyn Fn(&mut Context) -> HandlerResult + Send + Sync>;

/// Turns an error that escaped a chain into a response.
pub type ErrorHandler = Arc<dyn Fn(HandlerError, &mut Context) -> HandlerResult + Send + Sync>;

/// An ordered list of handlers, run until one of them fails.
///
/// ```
/// # use rye::http::context::Context;
/// # use rye::http::handler::{Chain, HandlerResult};
/// # use rye::http::response::StatusCode;
/// fn auth(_ctx: &mut Context) -> HandlerResult { Ok(()) }
/// fn hello(ctx: &mut Context) -> HandlerResult { ctx.string(StatusCode::OK, "hi") }
///
/// let chain = Chain::new().with(auth).with(hello);
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    handlers: Vec<Handler>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler to the end of the chain.
    pub fn with<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler in order, stopping at the first error.
    pub fn run(&self, ctx: &mut Context) -> HandlerResult {
        for handler in &self.handlers {
            handler(ctx)?;
        }
        Ok(())
    }
}

impl<F> From<F> for Chain
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Chain::new().with(handler)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
