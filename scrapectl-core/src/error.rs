use std::path::PathBuf;

use thiserror::Error;

/// Rejections surfaced synchronously by the job controller.
///
/// Every variant is produced before the engine is dispatched, so the job
/// state is untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobControlError {
    #[error("a scrape job is already in progress")]
    JobAlreadyRunning,

    #[error("configuration error: {}", .0.join(", "))]
    Configuration(Vec<String>),

    #[error("unsupported source url: {0}")]
    UnsupportedSource(String),

    #[error("path is outside the allowed directories: {}", .0.display())]
    PathAccessDenied(PathBuf),

    #[error("single-file mode requires a file path")]
    MissingTarget,

    #[error("target file does not exist: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("failed to launch scrape job: {0}")]
    Launch(String),
}

impl From<PathAccessError> for JobControlError {
    fn from(err: PathAccessError) -> Self {
        match err {
            PathAccessError::Denied(path) => Self::PathAccessDenied(path),
            PathAccessError::Unresolvable { path, .. } => {
                Self::PathAccessDenied(path)
            }
            err @ PathAccessError::NoAllowedDirectories => {
                Self::Configuration(vec![err.to_string()])
            }
        }
    }
}

impl From<EngineError> for JobControlError {
    fn from(err: EngineError) -> Self {
        match err {
            err @ (EngineError::NoMediaRoots | EngineError::InvalidRoot(_)) => {
                Self::Configuration(vec![err.to_string()])
            }
            EngineError::MissingFile(path) => Self::TargetNotFound(path),
            other => Self::Launch(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum PathAccessError {
    #[error("access denied: {} is outside the allowed directories", .0.display())]
    Denied(PathBuf),

    #[error("failed to resolve {}: {source}", path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no allowed directories are configured")]
    NoAllowedDirectories,
}

/// Launch-time failures reported by a [`crate::JobEngine`] preflight.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no media roots are configured")]
    NoMediaRoots,

    #[error("media root is not a readable directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("target file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-item failure. Recorded into the failed results, never propagated.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("no identifier found in file name")]
    IdentifierNotFound,

    #[error("source lookup failed: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, JobControlError>;
