//! Error types for rename operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while planning or applying a rename.
///
/// Every variant that touches the filesystem carries the offending path so the
/// message printed by the CLI is actionable on its own.
#[derive(Error, Debug)]
pub enum RenameError {
    /// A `--pair` argument that is not of the form `OLD=NEW`
    #[error("invalid token pair '{0}': expected OLD=NEW")]
    InvalidPair(String),

    /// A token that cannot be used for substitution or as a directory name
    #[error("invalid token '{token}': {reason}")]
    InvalidToken { token: String, reason: &'static str },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rename destination already exists (or is claimed by another rename)
    #[error("cannot rename {} to {}: destination already exists", from.display(), to.display())]
    Collision { from: PathBuf, to: PathBuf },

    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] ignore::Error),

    #[error("failed to reset staging index {}: {source}", path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for rename operations
pub type Result<T> = std::result::Result<T, RenameError>;
