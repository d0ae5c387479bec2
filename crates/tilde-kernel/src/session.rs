//! Terminal sessions and the store that holds them.
//!
//! A [`Session`] is one client's private view of the terminal: a seeded
//! [`Tree`] plus a working directory. Sessions live in a [`SessionStore`],
//! keyed by an opaque [`SessionId`] that the HTTP layer keeps in a cookie.
//!
//! Locking is per session. The store map is sharded ([`DashMap`]) and each
//! session sits behind its own mutex, so two clients never contend and one
//! client's commands run one at a time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::commands::Command;
use crate::config::TerminalConfig;
use crate::vfs::{Tree, VfsError, VfsResult, is_within, path, seed};

/// A session identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Create a new time-ordered ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters, for logs only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.short())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// One client's terminal state.
#[derive(Debug, Clone)]
pub struct Session {
    identity: String,
    home: String,
    cwd: String,
    tree: Tree,
    last_seen: Instant,
}

/// Check that `identity` can name a home directory: exactly one path segment
/// below `/home`.
pub fn validate_identity(identity: &str) -> VfsResult<()> {
    match identity {
        "" | "." | ".." => Err(VfsError::invalid_path(identity)),
        _ if identity.contains('/') => Err(VfsError::invalid_path(identity)),
        _ => Ok(()),
    }
}

impl Session {
    /// Seed a fresh session for `identity`.
    ///
    /// The identity names the home directory and nothing else. Identities
    /// that are not a single plain segment are rejected, since they would
    /// move or break the home sandbox.
    pub fn new(identity: &str, config: &TerminalConfig) -> VfsResult<Self> {
        validate_identity(identity)?;
        Ok(Self::seed(identity, config))
    }

    /// Seed without validation. Callers have run [`validate_identity`].
    pub(crate) fn seed(identity: &str, config: &TerminalConfig) -> Self {
        let home = format!("/home/{identity}");
        let tree = seed::default_tree(identity, &config.readme, Command::names());
        Self {
            identity: identity.to_string(),
            cwd: home.clone(),
            home,
            tree,
            last_seen: Instant::now(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// `/home/<identity>`.
    pub fn home(&self) -> &str {
        &self.home
    }

    /// Current working directory, always absolute.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Working directory as a prompt shows it: `~` for exactly home.
    pub fn display_cwd(&self) -> &str {
        if self.cwd == self.home { "~" } else { &self.cwd }
    }

    /// Change directory. The caller has checked that `path` is a directory.
    pub fn set_cwd(&mut self, path: impl Into<String>) {
        self.cwd = path::sanitize_path(&path.into());
    }

    pub fn go_home(&mut self) {
        self.cwd = self.home.clone();
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &str) -> String {
        path::resolve(&self.cwd, &self.home, path)
    }

    /// Sandbox check: mutations are allowed only at or below home.
    pub fn can_write(&self, path: &str) -> bool {
        is_within(&path::sanitize_path(path), &self.home)
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    /// Record activity, for idle expiry.
    pub fn mark_seen(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// A session shared between the store and an in-flight command.
pub type SharedSession = Arc<Mutex<Session>>;

/// Storage for sessions, keyed by [`SessionId`].
///
/// Implementations must keep sessions isolated: a call for one id never
/// reads or mutates another id's session.
pub trait SessionStore: Send + Sync {
    /// Look up an existing session.
    fn get(&self, id: &SessionId) -> Option<SharedSession>;

    /// Look up a session, creating it with `init` if absent.
    fn get_or_insert_with(&self, id: &SessionId, init: &dyn Fn() -> Session) -> SharedSession;

    /// Drop a session. Returns whether it existed.
    fn remove(&self, id: &SessionId) -> bool;

    /// Drop sessions idle for longer than `max_idle`. Sessions currently
    /// locked by a command are kept. Returns how many were dropped.
    fn prune_idle(&self, max_idle: Duration) -> usize;

    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory session store. Everything is lost when dropped.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, SharedSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.get(id).map(|s| Arc::clone(s.value()))
    }

    fn get_or_insert_with(&self, id: &SessionId, init: &dyn Fn() -> Session) -> SharedSession {
        // Clone the Arc so the shard lock is released before anyone locks the session.
        let entry = self
            .sessions
            .entry(*id)
            .or_insert_with(|| {
                tracing::info!(session = %id.short(), "seeding new terminal session");
                Arc::new(Mutex::new(init()))
            });
        Arc::clone(entry.value())
    }

    fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    fn prune_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Some(s) => s.last_seen().elapsed() <= max_idle,
            None => true,
        });
        before.saturating_sub(self.sessions.len())
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
