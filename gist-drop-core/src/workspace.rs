//! Ephemeral per-request workspaces.

use std::io;
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

/// An exclusive scratch directory holding one cloned working copy.
///
/// Dropping the workspace removes the directory and everything in it.
/// Removal is best-effort: a failed cleanup never masks the error that
/// unwound the pipeline.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Allocate a uniquely named directory under the system temp root.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("gist-drop-").tempdir()?;
        debug!(path = %dir.path().display(), "allocated workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
