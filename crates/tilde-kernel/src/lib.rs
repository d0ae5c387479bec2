//! # tilde-kernel
//!
//! Engine of the tilde web terminal. Every client gets a private, seeded
//! virtual filesystem and a working directory; a small set of shell-style
//! commands reads and edits that tree.
//!
//! - [`vfs`]: the in-memory tree, path handling and the default layout
//! - [`session`]: per-client state and the [`SessionStore`] holding it
//! - [`commands`]: the command catalog and its implementations
//! - [`Terminal`]: dispatch, panic containment and session lifecycle
//!
//! The crate has no I/O of its own; a transport (see `tilde-server`) maps
//! requests onto [`Terminal::execute`] and [`Terminal::prompt`].

pub mod commands;
pub mod config;
pub mod session;
pub mod terminal;
pub mod vfs;

pub use commands::{Command, CommandResult, ShellError};
pub use config::TerminalConfig;
pub use session::{MemorySessionStore, Session, SessionId, SessionStore, SharedSession};
pub use terminal::{Terminal, TerminalOutput};
pub use vfs::{Node, NodeKind, Permissions, Tree, VfsError, VfsResult};
