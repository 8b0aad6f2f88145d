//! Serving
//!
//! [`Server`] collects routes, then hands a frozen router to the accept loop
//! in [`listener`].

pub mod app;
pub mod listener;

pub use app::Server;
