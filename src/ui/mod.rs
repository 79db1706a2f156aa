//! Terminal front end: reads commands, runs them, prints plain-text views.
//!
//! Commands run on the caller's task; the only background work is the
//! session's auto-load subscription.

pub mod handlers;
pub mod render;

pub use handlers::{Command, Reply, dispatch, parse};
