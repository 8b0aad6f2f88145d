use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::http::context::Context;
use crate::http::error::HandlerError;
use crate::http::handler::Chain;
use crate::http::reader::{ReadOutcome, read_request};
use crate::http::request::{Method, Request};
use crate::http::response::{CONTENT_TYPE, MIME_TEXT, Response};
use crate::http::writer::ResponseWriter;
use crate::routing::router::Router;

/// Per-connection deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Serves exactly one request/response cycle on a stream.
pub struct Connection<S = TcpStream> {
    stream: S,
    router: Arc<Router>,
    settings: ConnectionSettings,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Routing(Request),
    Executing(Context, Chain),
    ErrorHandling(Context, HandlerError),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            router,
            settings,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to `Closed`, then shuts the stream down.
    ///
    /// The shutdown runs whether the cycle completed or was abandoned.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Error closing connection");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => self.read().await?,

                ConnectionState::Routing(request) => self.route(request),

                ConnectionState::Executing(mut ctx, chain) => match chain.run(&mut ctx) {
                    Ok(()) => ConnectionState::Writing(Self::finish(ctx)),
                    Err(e) => ConnectionState::ErrorHandling(ctx, e),
                },

                ConnectionState::ErrorHandling(ctx, err) => self.handle_error(ctx, err),

                ConnectionState::Writing(mut writer) => {
                    timeout(
                        self.settings.write_timeout,
                        writer.write_to_stream(&mut self.stream),
                    )
                    .await
                    .map_err(|_| {
                        anyhow::anyhow!("write timed out after {:?}", self.settings.write_timeout)
                    })?
                    .context("writing response")?;

                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read(&mut self) -> anyhow::Result<ConnectionState> {
        let outcome = timeout(self.settings.read_timeout, read_request(&mut self.stream))
            .await
            .map_err(|_| anyhow::anyhow!("read timed out after {:?}", self.settings.read_timeout))?
            .context("reading request")?;

        Ok(match outcome {
            ReadOutcome::Request(request) => ConnectionState::Routing(request),
            ReadOutcome::Malformed(e) => {
                tracing::warn!(error = %e, "Rejecting malformed request");
                let response = Response::bad_request();
                log_handled(None, None, &response);
                ConnectionState::Writing(Self::prepare(response))
            }
            ReadOutcome::Empty => ConnectionState::Closed,
        })
    }

    fn route(&self, mut request: Request) -> ConnectionState {
        tracing::debug!(method = %request.method, path = %request.path, "Routing request");

        if let Some(matched) = self.router.lookup(&request.path, request.method) {
            let chain = matched.chain.clone();
            request.path_params = matched.params;
            return ConnectionState::Executing(Context::new(request), chain);
        }

        match self.router.catch_all() {
            Some(chain) => {
                tracing::debug!(path = %request.path, "No route matched, using catch-all");
                ConnectionState::Executing(Context::new(request), chain.clone())
            }
            None => {
                tracing::debug!(path = %request.path, "No route matched");
                let response = Response::not_found();
                log_handled(Some(request.method), Some(request.path.as_str()), &response);
                ConnectionState::Writing(Self::prepare(response))
            }
        }
    }

    fn handle_error(&self, mut ctx: Context, err: HandlerError) -> ConnectionState {
        tracing::debug!(error = %err, path = %ctx.url(), "Handler chain failed");

        match (self.router.error_handler())(err, &mut ctx) {
            Ok(()) => ConnectionState::Writing(Self::finish(ctx)),
            Err(e) => {
                tracing::error!(error = %e, path = %ctx.url(), "Error handler failed");
                let response = Response::internal_error();
                log_handled(Some(ctx.method()), Some(ctx.url()), &response);
                ConnectionState::Writing(Self::prepare(response))
            }
        }
    }

    fn finish(ctx: Context) -> ResponseWriter {
        let method = ctx.method();
        let path = ctx.url().to_string();
        let response = ctx.into_response();

        log_handled(Some(method), Some(path.as_str()), &response);

        Self::prepare(response)
    }

    /// Forces the headers every outgoing response carries.
    fn prepare(mut response: Response) -> ResponseWriter {
        if !response.has_header_ignore_case(CONTENT_TYPE) {
            response.set_header(CONTENT_TYPE, MIME_TEXT);
        }
        // Keep-alive is never offered.
        response.remove_header_ignore_case("Connection");
        response.set_header("Connection", "close");

        ResponseWriter::new(&response)
    }
}

/// Access log line for every response the connection sends. Malformed
/// requests have no method or path, logged as `-`.
fn log_handled(method: Option<Method>, path: Option<&str>, response: &Response) {
    let method = method.map_or("-", |m| m.as_str());
    tracing::info!(
        method = %method,
        path = %path.unwrap_or("-"),
        status = response.status_or_default().as_u16(),
        "Request handled"
    );
}
