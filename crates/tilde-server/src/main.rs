//! tilde server binary
//!
//! ## Usage
//!
//! ```bash
//! # Run on 127.0.0.1:5000
//! tilde-server
//!
//! # Config file, with a port override
//! tilde-server --config tilde.toml --port 8080
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tilde_kernel::{MemorySessionStore, Terminal};
use tilde_server::{AppState, ServerConfig, serve, spawn_pruner};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// tilde - a simulated terminal served over HTTP
#[derive(Parser, Debug)]
#[command(name = "tilde-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Take client addresses from X-Forwarded-For / X-Real-IP
    #[arg(long)]
    trust_proxy_headers: bool,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config.trust_proxy_headers |= self.trust_proxy_headers;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.into_config().context("invalid configuration")?;

    let store = Arc::new(MemorySessionStore::new());
    let terminal = Arc::new(Terminal::new(store, config.terminal.clone()));
    let pruner = spawn_pruner(
        Arc::clone(&terminal),
        config.prune_interval(),
        config.session_idle(),
    );

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, trust_proxy_headers = config.trust_proxy_headers, "tilde server listening");

    let state = AppState::new(terminal, &config);
    let result = serve(listener, state, shutdown_signal())
        .await
        .context("http server error");
    pruner.abort();
    tracing::info!("tilde server stopped");
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
