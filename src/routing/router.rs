//! Route lookup plus the fallbacks used when lookup fails.
//!
//! The router is assembled before serving starts and shared behind an `Arc`
//! afterwards; nothing mutates it while connections are in flight.

use std::fmt;
use std::sync::Arc;

use crate::http::error::default_error_handler;
use crate::http::handler::{Chain, ErrorHandler};
use crate::http::request::Method;
use crate::routing::tree::{RouteError, RouteMatch, RouteTree};

pub struct Router {
    tree: RouteTree,
    catch_all: Option<Chain>,
    error_handler: ErrorHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            tree: RouteTree::new(),
            catch_all: None,
            error_handler: Arc::new(default_error_handler),
        }
    }

    pub fn insert(&mut self, method: Method, path: &str, chain: Chain) -> Result<(), RouteError> {
        self.tree.insert(path, method, chain)
    }

    pub fn lookup(&self, path: &str, method: Method) -> Option<RouteMatch<'_>> {
        self.tree.lookup(path, method)
    }

    /// Chain run for requests no route matches.
    pub fn set_catch_all(&mut self, chain: Chain) {
        self.catch_all = Some(chain);
    }

    pub fn catch_all(&self) -> Option<&Chain> {
        self.catch_all.as_ref()
    }

    pub fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.error_handler = handler;
    }

    pub fn error_handler(&self) -> &ErrorHandler {
        &self.error_handler
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("tree", &self.tree)
            .field("catch_all", &self.catch_all)
            .finish_non_exhaustive()
    }
}
