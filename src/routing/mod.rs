//! Request routing
//!
//! This module maps an incoming method and path to the handler chain that
//! serves it, binding any `{name}` path parameters along the way.

pub mod router;
pub mod tree;

pub use router::Router;
pub use tree::{RouteError, RouteMatch, RouteTree};
