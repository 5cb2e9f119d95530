//! # contract: the version-control port the publish pipeline sequences
//!
//! One trait ([`VersionControl`]) covering the six operations a publish
//! needs: clone, configure, stage, commit, push, resolve. The production
//! implementation shells out to the `git` binary ([`crate::git::GitCli`]);
//! pipeline tests drive the generated [`MockVersionControl`] instead, so
//! sequencing and fallback policy are testable without external tooling.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; mocks are exported to dependent
//!   crates through the `test-export-mocks` feature (on by default).
//!
//! ## Error contract
//! - Every operation maps a non-zero child exit (or a missed deadline) to a
//!   [`PublishError`] naming the operation, with the child's combined output
//!   as the diagnostic. Implementations never panic on tool failure.

use std::path::Path;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::PublishError;

/// An opaque commit identifier read back from the working copy.
///
/// Used verbatim as the content-address path segment of every published
/// link, so one value is shared by all files of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The operations the publish pipeline needs from a version-control tool.
///
/// `dir` is always the working copy inside the request's workspace.
/// Implementations hold no per-request state: the pipeline owns sequencing
/// and the workspace lifetime.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Clone `remote_url` into `dir`; the directory itself becomes the
    /// working copy, on the remote's default branch as cloned.
    async fn clone_repo(&self, remote_url: &str, dir: &Path) -> Result<(), PublishError>;

    /// Set the committer identity for the working copy. Name first, then
    /// email; either step failing is total failure.
    async fn configure_identity(
        &self,
        dir: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), PublishError>;

    /// Stage one file, addressed relative to the working copy root.
    async fn stage(&self, dir: &Path, filename: &str) -> Result<(), PublishError>;

    /// Create a single commit from everything staged.
    async fn commit(&self, dir: &Path, message: &str) -> Result<(), PublishError>;

    /// Push `HEAD` to the named branch on `origin`.
    async fn push(&self, dir: &Path, branch: &str) -> Result<(), PublishError>;

    /// Read back the commit `HEAD` points at.
    async fn resolve_head(&self, dir: &Path) -> Result<CommitId, PublishError>;
}
