//! The terminal engine: command dispatch over a session store.
//!
//! [`Terminal`] is what a transport talks to. It looks up (or seeds) the
//! caller's session, runs one command under that session's lock and turns
//! every outcome, including a panicking command, into printable text.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::Serialize;

use crate::commands::{self, Command, CommandResult, ShellError};
use crate::config::TerminalConfig;
use crate::session::{Session, SessionId, SessionStore, SharedSession, validate_identity};
use crate::vfs::{VfsError, VfsResult};

/// What a command prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalOutput {
    pub output: String,
    /// Undecorated value, set only by the prompt query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl TerminalOutput {
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            raw: None,
        }
    }
}

impl From<CommandResult> for TerminalOutput {
    fn from(result: CommandResult) -> Self {
        match result {
            Ok(output) => Self::text(output),
            Err(e) => Self::text(e.to_string()),
        }
    }
}

/// Dispatches commands to per-client sessions.
pub struct Terminal {
    store: Arc<dyn SessionStore>,
    config: TerminalConfig,
}

impl Terminal {
    pub fn new(store: Arc<dyn SessionStore>, config: TerminalConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Run `command` with `args` in the session `id`, seeding it for
    /// `identity` on first use.
    #[tracing::instrument(skip(self, args), fields(session = %id.short()), name = "terminal.execute")]
    pub fn execute(&self, id: &SessionId, identity: &str, command: &str, args: &str) -> TerminalOutput {
        let Ok(parsed) = command.parse::<Command>() else {
            tracing::debug!("unknown command");
            return CommandResult::Err(ShellError::CommandNotFound(command.to_string())).into();
        };

        let result = self
            .with_session(id, identity, |session| {
                catch_unwind(AssertUnwindSafe(|| {
                    commands::run(parsed, session, args, &self.config)
                }))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(command, %message, "command panicked");
                    Err(ShellError::Fault {
                        command: command.to_string(),
                        message,
                    })
                })
            })
            .unwrap_or_else(|e| Err(invalid_identity(command, identity, &e)));

        match &result {
            Ok(_) if parsed == Command::Reset => {
                self.store.remove(id);
                tracing::info!("session reset");
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "command refused"),
        }
        result.into()
    }

    /// The prompt's working directory: `~` at home, otherwise the absolute
    /// path. `raw` always carries the absolute path.
    pub fn prompt(&self, id: &SessionId, identity: &str) -> TerminalOutput {
        let prompt = self.with_session(id, identity, |session| TerminalOutput {
            output: session.display_cwd().to_string(),
            raw: Some(session.cwd().to_string()),
        });
        prompt.unwrap_or_else(|e| CommandResult::Err(invalid_identity("pwd", identity, &e)).into())
    }

    /// Run `f` on the live session `id`, seeding it for `identity` if absent.
    ///
    /// The session is locked before it is marked seen, and the store is
    /// re-checked after locking: a session pruned or reset between lookup and
    /// lock is an orphan, so the lookup starts over on the live entry.
    fn with_session<R>(
        &self,
        id: &SessionId,
        identity: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> VfsResult<R> {
        validate_identity(identity)?;
        loop {
            let shared = self
                .store
                .get_or_insert_with(id, &|| Session::seed(identity, &self.config));
            let mut session = shared.lock();
            if !self.is_live(id, &shared) {
                tracing::debug!("session dropped before lock, retrying");
                continue;
            }
            session.mark_seen();
            return Ok(f(&mut session));
        }
    }

    fn is_live(&self, id: &SessionId, shared: &SharedSession) -> bool {
        self.store
            .get(id)
            .is_some_and(|live| Arc::ptr_eq(&live, shared))
    }
}

fn invalid_identity(command: &str, identity: &str, error: &VfsError) -> ShellError {
    tracing::warn!(identity, %error, "rejected client identity");
    ShellError::InvalidIdentity {
        command: command.to_string(),
        identity: identity.to_string(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn terminal() -> Terminal {
        Terminal::new(Arc::new(MemorySessionStore::new()), TerminalConfig::default())
    }

    #[test]
    fn test_unknown_command_does_not_seed() {
        let t = terminal();
        let id = SessionId::new();
        let out = t.execute(&id, "u", "sudo", "rm -rf /");
        assert_eq!(out.output, "Command not found: sudo");
        assert!(t.store().is_empty());
    }

    #[test]
    fn test_execute_seeds_and_persists() {
        let t = terminal();
        let id = SessionId::new();
        assert_eq!(t.execute(&id, "u", "touch", "a.txt").output, "");
        assert_eq!(t.execute(&id, "u", "ls", "").output, "Readme.txt a.txt");
        assert_eq!(t.store().len(), 1);
    }

    #[test]
    fn test_reset_drops_session() {
        let t = terminal();
        let id = SessionId::new();
        t.execute(&id, "u", "cd", "/etc");
        assert_eq!(
            t.execute(&id, "u", "reset", "").output,
            "Terminal session has been reset."
        );
        assert!(t.store().get(&id).is_none());
        assert_eq!(t.execute(&id, "u", "pwd", "").output, "/home/u");
    }

    #[test]
    fn test_prompt() {
        let t = terminal();
        let id = SessionId::new();
        let home = t.prompt(&id, "u");
        assert_eq!(home.output, "~");
        assert_eq!(home.raw.as_deref(), Some("/home/u"));

        t.execute(&id, "u", "cd", "/bin");
        let bin = t.prompt(&id, "u");
        assert_eq!(bin.output, "/bin");
        assert_eq!(bin.raw.as_deref(), Some("/bin"));
    }

    #[test]
    fn test_output_json_shape() {
        let plain = serde_json::to_value(TerminalOutput::text("hi")).unwrap();
        assert_eq!(plain, serde_json::json!({ "output": "hi" }));

        let t = terminal();
        let prompt = serde_json::to_value(t.prompt(&SessionId::new(), "u")).unwrap();
        assert_eq!(prompt, serde_json::json!({ "output": "~", "raw": "/home/u" }));
    }

    #[test]
    fn test_identity_that_escapes_home_is_rejected() {
        let t = terminal();
        let id = SessionId::new();
        assert_eq!(
            t.execute(&id, "..", "touch", "/etc/pwned").output,
            "touch: invalid client identity '..'"
        );
        assert_eq!(
            t.prompt(&id, "a/b").output,
            "pwd: invalid client identity 'a/b'"
        );
        assert!(t.store().is_empty());

        // A valid identity on the same id still sees an untouched /etc.
        assert_eq!(t.execute(&id, "u", "ls", "/etc").output, "");
    }

    /// Hands out a session once and then drops it from the map, the way an
    /// idle prune can land between lookup and lock.
    struct DropAfterLookup {
        inner: MemorySessionStore,
        armed: AtomicBool,
    }

    impl SessionStore for DropAfterLookup {
        fn get(&self, id: &SessionId) -> Option<SharedSession> {
            self.inner.get(id)
        }

        fn get_or_insert_with(&self, id: &SessionId, init: &dyn Fn() -> Session) -> SharedSession {
            let shared = self.inner.get_or_insert_with(id, init);
            if self.armed.swap(false, Ordering::SeqCst) {
                self.inner.remove(id);
            }
            shared
        }

        fn remove(&self, id: &SessionId) -> bool {
            self.inner.remove(id)
        }

        fn prune_idle(&self, max_idle: Duration) -> usize {
            self.inner.prune_idle(max_idle)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn test_command_never_lands_on_dropped_session() {
        let store = Arc::new(DropAfterLookup {
            inner: MemorySessionStore::new(),
            armed: AtomicBool::new(true),
        });
        let t = Terminal::new(store, TerminalConfig::default());
        let id = SessionId::new();

        assert_eq!(t.execute(&id, "u", "touch", "a.txt").output, "");
        assert_eq!(t.execute(&id, "u", "ls", "").output, "Readme.txt a.txt");
        assert_eq!(t.store().len(), 1);
    }

    #[test]
    fn test_panic_message() {
        let payload = catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload = catch_unwind(|| panic!("{} {}", "formatted", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 1");
    }
}
