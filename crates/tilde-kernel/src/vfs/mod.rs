//! Virtual filesystem for the web terminal.
//!
//! Key components:
//!
//! - [`Tree`] - A rooted tree of [`Node`]s, owned by one session
//! - [`path`] - Sanitization and resolution of `/`-separated paths
//! - [`seed`] - The default layout every new session starts from
//!
//! ## Design Decisions
//!
//! - **Tagged nodes**: [`NodeBody`] is `Directory | File | Binary`; only
//!   directories carry children.
//! - **No sandboxing here**: the tree mutates whatever it is told to. The
//!   home-directory sandbox and permission gates live in the command layer.
//! - **Insertion order**: children are a `Vec`, listings never sort.

mod error;
pub mod path;
pub mod seed;
mod tree;
mod types;

pub use error::{VfsError, VfsResult};
pub use path::{is_within, resolve, sanitize_path};
pub use tree::Tree;
pub use types::{Node, NodeBody, NodeKind, Permissions};
