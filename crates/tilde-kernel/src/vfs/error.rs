//! VFS error types.

use thiserror::Error;

/// VFS error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// Node or parent directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A node with that name already exists and cannot be replaced.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a regular file, found a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Expected a regular file, found a binary.
    #[error("not a regular file: {0}")]
    NotAFile(String),

    /// Path has no final segment (the root).
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl Into<String>) -> Self {
        Self::IsADirectory(path.into())
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::NotAFile(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;
