//! HTTP surface: routes, session cookie and client identity.
//!
//! Every terminal route answers `200` with a JSON `{ "output": ... }` body.
//! Failures are part of the output text, never a status code.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tilde_kernel::{SessionId, Terminal, TerminalOutput};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::constants::{FORWARDED_FOR_HEADER, REAL_IP_HEADER, SESSION_COOKIE_ATTRIBUTES};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    terminal: Arc<Terminal>,
    cookie_name: Arc<str>,
    trust_proxy_headers: bool,
}

impl AppState {
    pub fn new(terminal: Arc<Terminal>, config: &ServerConfig) -> Self {
        Self {
            terminal,
            cookie_name: Arc::from(config.session_cookie.as_str()),
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }

    pub fn terminal(&self) -> &Arc<Terminal> {
        &self.terminal
    }

    /// The session named by the request's cookie, or a fresh id plus the
    /// `Set-Cookie` value that hands it out.
    fn session(&self, headers: &HeaderMap) -> (SessionId, Option<String>) {
        match session_cookie(headers, &self.cookie_name) {
            Some(id) => (id, None),
            None => {
                let id = SessionId::new();
                let cookie = format!("{}={id}; {SESSION_COOKIE_ATTRIBUTES}", self.cookie_name);
                (id, Some(cookie))
            }
        }
    }

    fn identity(&self, headers: &HeaderMap, peer: SocketAddr) -> String {
        client_identity(headers, peer, self.trust_proxy_headers)
    }
}

/// Body of `POST /terminal/execute/{command}`.
#[derive(Debug, Default, Deserialize)]
struct ExecuteRequest {
    #[serde(default)]
    args: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/terminal/execute/{command}", post(execute))
        .route("/terminal/pwd", get(pwd))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

#[tracing::instrument(skip_all, name = "http.execute")]
async fn execute(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(command): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // A missing or malformed body means "no arguments", like a bare command.
    let request: ExecuteRequest = serde_json::from_slice(&body).unwrap_or_default();
    let (id, set_cookie) = state.session(&headers);
    let identity = state.identity(&headers, peer);

    let output = run_blocking(&state, command.clone(), move |terminal| {
        terminal.execute(&id, &identity, &command, &request.args)
    })
    .await;
    respond(output, set_cookie)
}

#[tracing::instrument(skip_all, name = "http.pwd")]
async fn pwd(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let (id, set_cookie) = state.session(&headers);
    let identity = state.identity(&headers, peer);
    let output = run_blocking(&state, "pwd".to_string(), move |terminal| {
        terminal.prompt(&id, &identity)
    })
    .await;
    respond(output, set_cookie)
}

/// Run a terminal call on the blocking pool. Commands wait on their
/// session's mutex, which must not park a runtime worker.
async fn run_blocking(
    state: &AppState,
    command: String,
    f: impl FnOnce(&Terminal) -> TerminalOutput + Send + 'static,
) -> TerminalOutput {
    let terminal = Arc::clone(&state.terminal);
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(|| f(&terminal)))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, %command, "terminal task failed");
            TerminalOutput::text(format!("{command}: {e}"))
        })
}

fn respond(output: TerminalOutput, set_cookie: Option<String>) -> Response {
    let mut response = Json(output).into_response();
    if let Some(cookie) = set_cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "unencodable session cookie"),
        }
    }
    response
}

/// Parse the session id out of the `Cookie` headers. Unknown or malformed
/// values count as absent.
fn session_cookie(headers: &HeaderMap, name: &str) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// The client's address as used for its home directory.
///
/// Proxy headers are honoured only when trusted, and only if they hold a
/// well-formed IP, so a client can never pick an arbitrary directory name.
fn client_identity(headers: &HeaderMap, peer: SocketAddr, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        let header_ip = |name: &str, first_only: bool| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| if first_only { v.split(',').next().unwrap_or(v) } else { v })
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };
        let forwarded = header_ip(FORWARDED_FOR_HEADER, true);
        if let Some(ip) = forwarded.or_else(|| header_ip(REAL_IP_HEADER, false)) {
            return ip.to_string();
        }
    }
    peer.ip().to_string()
}

/// Periodically drop sessions idle for longer than `max_idle`.
pub fn spawn_pruner(terminal: Arc<Terminal>, every: Duration, max_idle: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick fires immediately; nothing can be idle yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let pruned = terminal.store().prune_idle(max_idle);
            if pruned > 0 {
                tracing::info!(pruned, live = terminal.store().len(), "pruned idle sessions");
            }
        }
    })
}

/// Serve `state` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "10.0.0.7:51515".parse().unwrap()
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_session_cookie_parsing() {
        let id = SessionId::new();
        let h = headers(&[("cookie", &format!("theme=dark; tilde_session={id}; x=y"))]);
        assert_eq!(session_cookie(&h, "tilde_session"), Some(id));
        assert_eq!(session_cookie(&h, "other"), None);

        let garbage = headers(&[("cookie", "tilde_session=not-a-uuid")]);
        assert_eq!(session_cookie(&garbage, "tilde_session"), None);

        let split = headers(&[("cookie", "a=b"), ("cookie", &format!("tilde_session={id}"))]);
        assert_eq!(session_cookie(&split, "tilde_session"), Some(id));
    }

    #[test]
    fn test_identity_ignores_untrusted_headers() {
        let h = headers(&[("x-forwarded-for", "1.2.3.4")]);
        assert_eq!(client_identity(&h, peer(), false), "10.0.0.7");
    }

    #[test]
    fn test_identity_from_proxy_headers() {
        let h = headers(&[("x-forwarded-for", "1.2.3.4, 10.0.0.1")]);
        assert_eq!(client_identity(&h, peer(), true), "1.2.3.4");

        let h = headers(&[("x-real-ip", " 5.6.7.8 ")]);
        assert_eq!(client_identity(&h, peer(), true), "5.6.7.8");

        let h = headers(&[("x-forwarded-for", "../../etc"), ("x-real-ip", "::1")]);
        assert_eq!(client_identity(&h, peer(), true), "::1");

        let h = headers(&[("x-forwarded-for", "nonsense")]);
        assert_eq!(client_identity(&h, peer(), true), "10.0.0.7");
    }

    #[test]
    fn test_respond_sets_cookie_only_when_new() {
        let out = TerminalOutput::text("hi");
        let fresh = respond(out.clone(), Some("tilde_session=abc; HttpOnly".into()));
        assert_eq!(
            fresh.headers().get(SET_COOKIE).unwrap(),
            "tilde_session=abc; HttpOnly"
        );
        assert!(respond(out, None).headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn test_malformed_body_means_no_args() {
        let parsed: ExecuteRequest = serde_json::from_slice(b"{not json").unwrap_or_default();
        assert_eq!(parsed.args, "");
        let parsed: ExecuteRequest = serde_json::from_slice(b"{}").unwrap_or_default();
        assert_eq!(parsed.args, "");
        let parsed: ExecuteRequest =
            serde_json::from_slice(br#"{"args": "-a /"}"#).unwrap_or_default();
        assert_eq!(parsed.args, "-a /");
    }
}
