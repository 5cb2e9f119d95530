//! Startup configuration: flags and environment variables, read once.
//!
//! This is the only place ambient configuration is consulted. `Args` is the
//! raw clap surface (each flag backed by a `GIST_DROP_*` variable);
//! [`Config::from_args`] turns it into the validated, immutable struct the
//! rest of the process shares. Missing required values fail startup inside
//! `Args::parse` with a clap diagnostic.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use gist_drop_core::links::GistRemote;
use gist_drop_core::publish::PublishConfig;

/// Upload-to-gist publishing service.
#[derive(Debug, Parser)]
#[command(
    name = "gist-drop",
    version,
    about = "Publish HTTP file uploads to a git-backed gist and answer with content-addressed raw links"
)]
pub struct Args {
    /// Push/fetch URL of the gist remote.
    #[arg(long, env = "GIST_DROP_REMOTE")]
    pub remote: String,

    /// Owner handle embedded in every constructed raw link.
    #[arg(long, env = "GIST_DROP_OWNER")]
    pub owner: String,

    /// Committer name recorded on publish commits.
    #[arg(long, env = "GIST_DROP_COMMITTER_NAME", default_value = "gist-drop")]
    pub committer_name: String,

    /// Committer email recorded on publish commits.
    #[arg(
        long,
        env = "GIST_DROP_COMMITTER_EMAIL",
        default_value = "gist-drop@localhost"
    )]
    pub committer_email: String,

    /// Message used for every publish commit.
    #[arg(
        long,
        env = "GIST_DROP_COMMIT_MESSAGE",
        default_value = "Add files via gist-drop"
    )]
    pub commit_message: String,

    /// Address the HTTP server binds to.
    #[arg(long, env = "GIST_DROP_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Directory served at `/` (the upload page).
    #[arg(long, env = "GIST_DROP_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Deadline for each git child process, in seconds.
    #[arg(long, env = "GIST_DROP_GIT_TIMEOUT_SECS", default_value_t = 120)]
    pub git_timeout_secs: u64,

    /// Log at debug level by default (`RUST_LOG` still wins).
    #[arg(long, env = "GIST_DROP_VERBOSE")]
    pub verbose: bool,
}

/// Validated process-wide configuration, built once at startup and immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    pub publish: PublishConfig,
    pub listen: SocketAddr,
    pub static_dir: PathBuf,
    pub git_timeout: Duration,
    pub verbose: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let remote = GistRemote::parse(&args.remote);

        Self {
            publish: PublishConfig {
                remote,
                owner: args.owner,
                committer_name: args.committer_name,
                committer_email: args.committer_email,
                commit_message: args.commit_message,
            },
            listen: args.listen,
            static_dir: args.static_dir,
            git_timeout: Duration::from_secs(args.git_timeout_secs),
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_everything_but_remote_and_owner() {
        let args = Args::try_parse_from([
            "gist-drop",
            "--remote",
            "git@gist.github.com:abc123.git",
            "--owner",
            "alice",
        ])
        .expect("minimal arguments should parse");
        let config = Config::from_args(args);

        assert_eq!(config.publish.remote.id(), "abc123");
        assert_eq!(config.publish.committer_name, "gist-drop");
        assert_eq!(config.publish.committer_email, "gist-drop@localhost");
        assert_eq!(config.publish.commit_message, "Add files via gist-drop");
        assert_eq!(config.listen.port(), 3000);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.git_timeout, Duration::from_secs(120));
        assert!(!config.verbose);
    }

    #[test]
    fn verbose_flag_reaches_the_config() {
        let args = Args::try_parse_from([
            "gist-drop",
            "--remote",
            "git@gist.github.com:abc123.git",
            "--owner",
            "alice",
            "--verbose",
        ])
        .expect("arguments should parse");
        let config = Config::from_args(args);
        assert!(config.verbose);
    }

    #[test]
    fn rejects_a_malformed_listen_address() {
        let err = Args::try_parse_from([
            "gist-drop",
            "--remote",
            "r.git",
            "--owner",
            "alice",
            "--listen",
            "not-an-address",
        ])
        .expect_err("bad listen address must not parse");
        assert!(err.to_string().contains("--listen"));
    }
}
