//! Error taxonomy for the publish pipeline.
//!
//! Three families: [`InputError`] for uploads that cannot be used,
//! [`PublishError`] for git operations that exit non-zero or miss their
//! deadline, and [`Error`] as the umbrella the pipeline returns, which also
//! absorbs workspace I/O failures.

use thiserror::Error;

/// A rejected upload. The request body itself is unusable; nothing about the
/// remote or the workspace caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The multipart envelope was valid but carried no `file` parts.
    #[error("no files uploaded")]
    EmptyUpload,

    /// The multipart body could not be parsed. Oversize bodies surface here
    /// too, since the transport aborts them mid-parse.
    #[error("failed to parse multipart form: {0}")]
    FormParse(String),

    /// The part's filename cannot be used as a path inside the workspace.
    #[error("invalid filename {name:?}: {reason}")]
    Filename { name: String, reason: &'static str },
}

/// Which git operation a [`PublishError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitOperation {
    Clone,
    Configure,
    Stage,
    Commit,
    Push,
    Resolve,
}

impl GitOperation {
    /// The subcommand name as it appears in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            GitOperation::Clone => "clone",
            GitOperation::Configure => "config",
            GitOperation::Stage => "add",
            GitOperation::Commit => "commit",
            GitOperation::Push => "push",
            GitOperation::Resolve => "rev-parse",
        }
    }
}

impl std::fmt::Display for GitOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A git operation failed. `detail` carries the child's combined output,
/// trimmed, or the timeout notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("git {operation} failed: {detail}")]
pub struct PublishError {
    pub operation: GitOperation,
    pub detail: String,
}

impl PublishError {
    pub fn new(operation: GitOperation, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}

/// Umbrella error for one publish attempt.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Workspace allocation or a file write failed.
    #[error("workspace i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
