//! Rye - a small HTTP/1.1 server engine
//!
//! Parses raw requests, routes them through a segment trie to handler
//! chains, and writes one response per connection.

pub mod config;
pub mod http;
pub mod routing;
pub mod server;

pub use http::context::Context;
pub use http::error::{BodyKind, HandlerError, HttpError};
pub use http::handler::{Chain, HandlerResult};
pub use http::request::Method;
pub use http::response::StatusCode;
pub use server::Server;
