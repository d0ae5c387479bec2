//! HTTP front end for the tilde web terminal.
//!
//! Wires [`tilde_kernel::Terminal`] to axum: one route per terminal action,
//! a cookie-held session id and an idle-session pruner.

pub mod config;
pub mod constants;
pub mod http;

pub use config::{ConfigError, ServerConfig};
pub use http::{AppState, router, serve, spawn_pruner};
