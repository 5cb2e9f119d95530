//! High-level pipeline: clone → configure → materialize → commit → push →
//! resolve, for one upload request.
//!
//! The pipeline is linear with no branching success paths. Every step runs
//! against the [`VersionControl`] port, so the sequencing and the push
//! fallback policy are testable against a mock as well as the real git
//! driver.
//!
//! # Major types
//! - [`PublishConfig`]: immutable per-process inputs (remote, owner,
//!   committer identity, commit message)
//! - [`IncomingFile`]: one part extracted from the multipart upload
//! - [`PublishReport`]: the resolved commit plus one link per uploaded file
//!
//! # Error handling
//! The first failing step aborts the run; the workspace is an RAII value, so
//! its directory is removed on every exit path, success or failure. A push
//! failure therefore discards the local commit along with the workspace and
//! publishes nothing.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::contract::{CommitId, VersionControl};
use crate::error::{Error, InputError, PublishError};
use crate::links::{self, GistRemote, PublishedFile};
use crate::workspace::Workspace;

/// Branch reference the push tries first.
const PRIMARY_BRANCH: &str = "main";
/// Branch reference the push falls back to when the primary is rejected.
const FALLBACK_BRANCH: &str = "master";

/// Immutable inputs the pipeline needs for every request.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub remote: GistRemote,
    /// Owner handle embedded in every constructed raw link.
    pub owner: String,
    pub committer_name: String,
    pub committer_email: String,
    pub commit_message: String,
}

/// One file extracted from the multipart upload, in upload order.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub content: Vec<u8>,
}

/// What a successful publish produced.
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// The commit every file of this request landed in.
    pub commit: CommitId,
    /// One entry per uploaded file, in upload order.
    pub files: Vec<PublishedFile>,
}

/// Publish an upload: materialize `files` into a fresh clone of the remote,
/// commit them together, push with the branch-name fallback and derive one
/// content-addressed link per file.
///
/// No link is returned unless the push succeeded.
#[instrument(skip(config, vcs, files), fields(remote = %config.remote.url(), file_count = files.len()))]
pub async fn publish<V>(
    config: &PublishConfig,
    vcs: &V,
    files: &[IncomingFile],
) -> Result<PublishReport, Error>
where
    V: VersionControl + ?Sized,
{
    let workspace = Workspace::create()?;
    let dir = workspace.path();

    vcs.clone_repo(config.remote.url(), dir).await?;
    vcs.configure_identity(dir, &config.committer_name, &config.committer_email)
        .await?;

    if files.is_empty() {
        return Err(InputError::EmptyUpload.into());
    }

    // Every name is checked before the first byte lands in the workspace.
    for file in files {
        validate_filename(&file.name)?;
    }

    for file in files {
        tokio::fs::write(dir.join(&file.name), &file.content).await?;
        vcs.stage(dir, &file.name).await?;
    }
    info!(staged = files.len(), "materialized upload into workspace");

    vcs.commit(dir, &config.commit_message).await?;
    let branch = push_with_fallback(vcs, dir).await?;

    let commit = vcs.resolve_head(dir).await?;
    let published = files
        .iter()
        .map(|file| PublishedFile {
            filename: file.name.clone(),
            raw_url: links::raw_url(&config.owner, &config.remote, &commit, &file.name),
        })
        .collect();

    info!(%commit, %branch, "publish complete");
    Ok(PublishReport {
        commit,
        files: published,
    })
}

/// Two-shot push policy: try `main`, then `master`. Returns the branch that
/// accepted the push; when both reject, the error carries the second
/// attempt's diagnostics.
async fn push_with_fallback<V>(vcs: &V, dir: &Path) -> Result<&'static str, PublishError>
where
    V: VersionControl + ?Sized,
{
    match vcs.push(dir, PRIMARY_BRANCH).await {
        Ok(()) => Ok(PRIMARY_BRANCH),
        Err(primary) => {
            warn!(
                error = %primary,
                "push to {} rejected, retrying {}",
                PRIMARY_BRANCH,
                FALLBACK_BRANCH
            );
            vcs.push(dir, FALLBACK_BRANCH).await?;
            Ok(FALLBACK_BRANCH)
        }
    }
}

/// A filename must address exactly one path component inside the workspace;
/// anything else could escape it or rewrite tracked state.
fn validate_filename(name: &str) -> Result<(), InputError> {
    use std::path::Component;

    let reject = |reason: &'static str| InputError::Filename {
        name: name.to_owned(),
        reason,
    };

    if name.is_empty() {
        return Err(reject("empty"));
    }
    // A backslash is a legal byte in a Unix filename but a separator on the
    // uploader's side; reject rather than guess.
    if name.contains('\\') {
        return Err(reject("contains a path separator"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(reject("must be a single relative path component")),
    }
}
