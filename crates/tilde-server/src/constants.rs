//! Server configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

use std::net::{IpAddr, Ipv4Addr};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address (localhost only).
pub const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Name of the cookie carrying the session id.
pub const DEFAULT_SESSION_COOKIE: &str = "tilde_session";

/// Sessions untouched for this long are dropped (one day).
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 24 * 60 * 60;

/// How often the pruner sweeps the session store.
pub const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 5 * 60;

/// Attributes appended to the session cookie.
pub const SESSION_COOKIE_ATTRIBUTES: &str = "HttpOnly; SameSite=Lax; Path=/";

/// Proxy headers consulted for the client address, in order.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const REAL_IP_HEADER: &str = "x-real-ip";
