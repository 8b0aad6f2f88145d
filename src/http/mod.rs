//! HTTP protocol implementation.
//!
//! This module implements a restricted HTTP/1.1 server: one request and one
//! response per connection, then the connection is closed.
//!
//! # Architecture
//!
//! - **`reader`**: Drains the socket into a buffer
//! - **`parser`**: Parses that buffer into a [`request::Request`]
//! - **`query`**: Percent-decoding and path segmentation shared with routing
//! - **`context`**: Per-request state handed to handlers
//! - **`handler`**: Handler and chain types
//! - **`error`**: HTTP-shaped errors and the default error renderer
//! - **`store`**, **`bind`**: Scratch storage and map-to-struct binding
//! - **`response`**, **`writer`**: The response model and its wire format
//! - **`connection`**: The per-connection state machine tying it together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Drain socket, parse (read error → Closed,
//!        └──────┬──────┘   parse error → Writing 400)
//!               ▼
//!        ┌─────────────┐
//!        │   Routing   │ ← Route tree, else catch-all, else Writing 404
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Executing  │ ← Run chain until the first error
//!        └──────┬──────┘
//!               ├─ error → ErrorHandling (error handler, else fixed 500)
//!               ▼
//!        ┌─────────────┐
//!        │   Writing   │ ← Serialize with Connection: close
//!        └──────┬──────┘
//!               ▼
//!            Closed
//! ```

pub mod bind;
pub mod connection;
pub mod context;
pub mod error;
pub mod handler;
pub mod parser;
pub mod query;
pub mod reader;
pub mod request;
pub mod response;
pub mod store;
pub mod writer;
