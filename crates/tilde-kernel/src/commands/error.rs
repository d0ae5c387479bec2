//! Shell-facing command errors.
//!
//! The `Display` form of every variant is the exact text the terminal
//! prints, in the style of coreutils/bash messages.

use thiserror::Error;

/// A command that ran to completion but refused to do what was asked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// `cat` and `touch` without a path.
    #[error("{0}: missing file operand")]
    MissingFileOperand(&'static str),

    /// `rm` without a path.
    #[error("{0}: missing operand")]
    MissingOperand(&'static str),

    #[error("Usage: nano [file] CONTENT [text]\nExample: nano test.txt CONTENT Hello World")]
    NanoUsage,

    /// Directory listing of a path that is not a directory.
    #[error("{command}: cannot access '{path}': No such file or directory")]
    CannotAccess { command: &'static str, path: String },

    #[error("bash: cd: {0}: No such file or directory")]
    NoSuchDirectory(String),

    #[error("{command}: {path}: No such file or directory")]
    NoSuchFile { command: &'static str, path: String },

    #[error("{command}: {path}: Binary file")]
    BinaryFile { command: &'static str, path: String },

    /// Sandbox violation or read-only node. `action` is the verb in
    /// "cannot <action> '<path>'".
    #[error("{command}: cannot {action} '{path}': Permission denied")]
    PermissionDenied {
        command: &'static str,
        action: &'static str,
        path: String,
    },

    #[error("{command}: '{path}': File already exists")]
    AlreadyExists { command: &'static str, path: String },

    #[error("{command}: cannot create '{path}': No such file or directory")]
    CannotCreate { command: &'static str, path: String },

    #[error("{command}: failed to update '{path}'")]
    UpdateFailed { command: &'static str, path: String },

    #[error("rm: cannot remove '{0}': Is a directory")]
    IsADirectory(String),

    #[error("rm: cannot remove '{0}': No such file")]
    NothingToRemove(String),

    #[error("Failed to remove '{0}'")]
    RemoveFailed(String),

    #[error("Invalid date format.")]
    InvalidDateFormat,

    /// The client identity cannot name a home directory.
    #[error("{command}: invalid client identity '{identity}'")]
    InvalidIdentity { command: String, identity: String },

    /// Anything the command did not anticipate.
    #[error("{command}: {message}")]
    Fault { command: String, message: String },
}

/// Result of a single command: the text to print either way.
pub type CommandResult = Result<String, ShellError>;
