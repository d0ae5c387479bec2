//! Server configuration, loaded from TOML.
//!
//! ```toml
//! bind = "0.0.0.0"
//! port = 8080
//! trust_proxy_headers = true
//!
//! [terminal]
//! about = "Welcome to my corner of the web."
//! ```
//!
//! Every key is optional; missing keys take the values in [`crate::constants`].

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tilde_kernel::TerminalConfig;

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_PORT, DEFAULT_PRUNE_INTERVAL_SECS, DEFAULT_SESSION_COOKIE,
    DEFAULT_SESSION_IDLE_SECS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid session cookie name {0:?}")]
    InvalidCookieName(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Name of the cookie holding the session id.
    pub session_cookie: String,
    /// Idle time after which a session is dropped.
    pub session_idle_secs: u64,
    /// Period of the idle-session sweep.
    pub prune_interval_secs: u64,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Only enable behind a proxy that sets them.
    pub trust_proxy_headers: bool,
    pub terminal: TerminalConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDRESS,
            port: DEFAULT_PORT,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            prune_interval_secs: DEFAULT_PRUNE_INTERVAL_SECS,
            trust_proxy_headers: false,
            terminal: TerminalConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_cookie = !self.session_cookie.is_empty()
            && self
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_cookie {
            return Err(ConfigError::InvalidCookieName(self.session_cookie.clone()));
        }
        if self.prune_interval_secs == 0 {
            return Err(ConfigError::Zero("prune_interval_secs"));
        }
        if self.session_idle_secs == 0 {
            return Err(ConfigError::Zero("session_idle_secs"));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(config.session_cookie, "tilde_session");
        assert_eq!(config.session_idle(), Duration::from_secs(86400));
        assert_eq!(config.prune_interval(), Duration::from_secs(300));
        assert!(!config.trust_proxy_headers);
        config.validate().unwrap();
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
port = 8080
trust_proxy_headers = true

[terminal]
about = "hello"
"#,
        );
        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.trust_proxy_headers);
        assert_eq!(config.bind, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.terminal.about, "hello");
        assert_eq!(config.terminal.readme, TerminalConfig::default().readme);
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let file = write_config("");
        assert_eq!(ServerConfig::load(file.path()).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let missing = ServerConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));

        let file = write_config("port = \"eighty\"");
        let bad = ServerConfig::load(file.path()).unwrap_err();
        assert!(matches!(bad, ConfigError::Parse { .. }));
        assert!(bad.to_string().starts_with("failed to parse"));
    }

    #[test]
    fn test_validate() {
        let file = write_config("session_cookie = \"bad cookie\"");
        assert!(matches!(
            ServerConfig::load(file.path()).unwrap_err(),
            ConfigError::InvalidCookieName(_)
        ));

        let config = ServerConfig {
            prune_interval_secs: 0,
            ..ServerConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "prune_interval_secs must be greater than zero"
        );
    }
}
