//! Runs the `git` binary to implement the [`VersionControl`] port.
//!
//! Every invocation runs inside the request's workspace, under a deadline,
//! with terminal prompts disabled so an unauthenticated remote fails fast
//! instead of hanging on stdin.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::contract::{CommitId, VersionControl};
use crate::error::{GitOperation, PublishError};

/// Default deadline applied to each git child process.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(120);

/// [`VersionControl`] implementation shelling out to `git`.
#[derive(Debug, Clone)]
pub struct GitCli {
    op_timeout: Duration,
}

impl GitCli {
    pub fn new(op_timeout: Duration) -> Self {
        Self { op_timeout }
    }

    /// Run one git subcommand in `dir`, returning trimmed stdout.
    ///
    /// A non-zero exit and a missed deadline both become a [`PublishError`]
    /// for `operation`; the detail is the child's combined output, matching
    /// what the tool would have printed to a terminal.
    async fn run(
        &self,
        operation: GitOperation,
        dir: &Path,
        args: &[&str],
    ) -> Result<String, PublishError> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(dir);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output = timeout(self.op_timeout, cmd.output())
            .await
            .map_err(|_| {
                PublishError::new(
                    operation,
                    format!("timed out after {:?}", self.op_timeout),
                )
            })?
            .map_err(|e| PublishError::new(operation, format!("failed to spawn git: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let combined = format!("{stdout}{stderr}");
            return Err(PublishError::new(
                operation,
                format!("status {}: {}", output.status, combined.trim()),
            ));
        }

        debug!(%operation, "git subcommand succeeded");
        Ok(stdout.trim().to_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(DEFAULT_OP_TIMEOUT)
    }
}

#[async_trait]
impl VersionControl for GitCli {
    #[instrument(skip(self), fields(%remote_url, dir = %dir.display()))]
    async fn clone_repo(&self, remote_url: &str, dir: &Path) -> Result<(), PublishError> {
        self.run(GitOperation::Clone, dir, &["clone", remote_url, "."])
            .await?;
        Ok(())
    }

    #[instrument(skip(self, name, email), fields(dir = %dir.display()))]
    async fn configure_identity(
        &self,
        dir: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), PublishError> {
        self.run(GitOperation::Configure, dir, &["config", "user.name", name])
            .await?;
        self.run(GitOperation::Configure, dir, &["config", "user.email", email])
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %dir.display(), %filename))]
    async fn stage(&self, dir: &Path, filename: &str) -> Result<(), PublishError> {
        self.run(GitOperation::Stage, dir, &["add", "--", filename])
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(dir = %dir.display()))]
    async fn commit(&self, dir: &Path, message: &str) -> Result<(), PublishError> {
        self.run(GitOperation::Commit, dir, &["commit", "-m", message])
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %dir.display(), %branch))]
    async fn push(&self, dir: &Path, branch: &str) -> Result<(), PublishError> {
        let refspec = format!("HEAD:{branch}");
        self.run(GitOperation::Push, dir, &["push", "origin", &refspec])
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    async fn resolve_head(&self, dir: &Path) -> Result<CommitId, PublishError> {
        let head = self
            .run(GitOperation::Resolve, dir, &["rev-parse", "HEAD"])
            .await?;
        Ok(CommitId::new(head))
    }
}
