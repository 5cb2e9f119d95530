//! Derives public gist URLs from the configured remote and a commit.
//!
//! The remote URL is parsed once at startup into a [`GistRemote`]; per
//! request, [`raw_url`] combines the owner handle, the gist identifier, the
//! resolved commit and each filename into a content-addressed link.

use crate::contract::CommitId;

/// Base URL for raw, content-addressed file downloads.
const RAW_CONTENT_BASE: &str = "https://gist.githubusercontent.com";

/// SSH-style host prefix gist push URLs commonly carry.
const SSH_PREFIX: &str = "git@gist.github.com:";

/// The configured gist remote.
///
/// `id` is the remote URL with a trailing `.git` and any SSH-style host
/// prefix stripped; it is the `{gist_id}` path segment of every link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistRemote {
    url: String,
    id: String,
}

impl GistRemote {
    /// Parse a push/fetch URL. Never fails: stripping is a no-op for remotes
    /// that carry neither the suffix nor the prefix (https forms, or the
    /// local paths the test suite uses).
    pub fn parse(url: &str) -> Self {
        let trimmed = url.strip_suffix(".git").unwrap_or(url);
        let id = trimmed.strip_prefix(SSH_PREFIX).unwrap_or(trimmed);
        Self {
            url: url.to_owned(),
            id: id.to_owned(),
        }
    }

    /// The URL to clone from and push to, exactly as configured.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The gist identifier used in constructed links.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Browser-facing gist page: `.git` stripped and the SSH prefix
    /// rewritten to the public host.
    pub fn view_url(&self) -> String {
        let trimmed = self.url.strip_suffix(".git").unwrap_or(&self.url);
        match trimmed.strip_prefix(SSH_PREFIX) {
            Some(id) => format!("https://gist.github.com/{id}"),
            None => trimmed.to_owned(),
        }
    }
}

/// One uploaded file and the address it was published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedFile {
    pub filename: String,
    pub raw_url: String,
}

/// Content-addressed download link for one file in one commit.
pub fn raw_url(owner: &str, remote: &GistRemote, commit: &CommitId, filename: &str) -> String {
    format!(
        "{RAW_CONTENT_BASE}/{owner}/{id}/raw/{commit}/{filename}",
        id = remote.id()
    )
}
