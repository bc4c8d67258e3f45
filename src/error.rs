use std::path::PathBuf;

use thiserror::Error;

const INIT_HINT: &str = "To initialise a new repository run: git init";

/// Unified error type for gitplus operations
#[derive(Error, Debug)]
pub enum GitPlusError {
    #[error("Git repository not found in {} or any parent directory", start.display())]
    RepositoryNotFound { start: PathBuf },

    #[error("Found {} but it is not a valid git repository: {source}", path.display())]
    InvalidRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitplus
pub type Result<T> = std::result::Result<T, GitPlusError>;

impl GitPlusError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitPlusError::Config(msg.into())
    }

    /// Remediation hint shown next to the error, if there is one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            GitPlusError::RepositoryNotFound { .. } | GitPlusError::InvalidRepository { .. } => {
                Some(INIT_HINT)
            }
            _ => None,
        }
    }
}
