use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::context::Context;
use crate::http::error::HandlerError;
use crate::http::handler::{Chain, HandlerResult};
use crate::http::request::Method;
use crate::routing::router::Router;
use crate::routing::tree::RouteError;
use crate::server::listener;

/// Route registration and serving.
///
/// ```no_run
/// # use rye::config::ServerConfig;
/// # use rye::http::context::Context;
/// # use rye::http::handler::HandlerResult;
/// # use rye::http::response::StatusCode;
/// # use rye::server::Server;
/// fn hello(ctx: &mut Context) -> HandlerResult {
///     ctx.string(StatusCode::OK, "Hello, World!")
/// }
///
/// # async fn start() -> anyhow::Result<()> {
/// let mut server = Server::new(ServerConfig::default());
/// server.get("/hello", hello)?;
/// server.run().await
/// # }
/// ```
pub struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: Router::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Registers a chain for `method` on `path`.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        chain: impl Into<Chain>,
    ) -> Result<&mut Self, RouteError> {
        self.router.insert(method, path, chain.into())?;
        Ok(self)
    }

    pub fn get(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::GET, path, chain)
    }

    pub fn post(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::POST, path, chain)
    }

    pub fn put(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::PUT, path, chain)
    }

    pub fn patch(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::PATCH, path, chain)
    }

    pub fn delete(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::DELETE, path, chain)
    }

    pub fn head(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::HEAD, path, chain)
    }

    pub fn options(&mut self, path: &str, chain: impl Into<Chain>) -> Result<&mut Self, RouteError> {
        self.route(Method::OPTIONS, path, chain)
    }

    /// Chain to run when no route matches. Without one, unmatched requests
    /// get a fixed 404.
    pub fn catch_all(&mut self, chain: impl Into<Chain>) -> &mut Self {
        self.router.set_catch_all(chain.into());
        self
    }

    /// Replaces the default error renderer.
    pub fn error_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(HandlerError, &mut Context) -> HandlerResult + Send + Sync + 'static,
    {
        self.router.set_error_handler(Arc::new(handler));
        self
    }

    /// Binds the configured address and serves until the accept loop fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr)
            .await
            .with_context(|| format!("binding {}", self.config.listen_addr))?;

        self.serve(listener).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        tracing::info!(
            routes = self.router.tree().len(),
            max_connections = self.config.max_connections,
            "Starting server (max_connections is advisory)"
        );

        let settings = self.config.connection_settings();
        listener::run(listener, Arc::new(self.router), settings).await
    }
}
