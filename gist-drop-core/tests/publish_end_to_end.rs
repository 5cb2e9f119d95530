//! End-to-end publishes through the real pipeline: `publish()` with the git
//! CLI driver against local bare remotes.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use gist_drop_core::git::GitCli;
use gist_drop_core::links::GistRemote;
use gist_drop_core::publish::{publish, IncomingFile, PublishConfig};

/// Runs `git` in `dir` and returns trimmed stdout, panicking on failure.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

/// Creates a bare remote whose default branch is `branch`, seeded with one
/// commit, plus a scratch root keeping everything alive.
fn seed_remote(branch: &str) -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().expect("tempdir");
    let remote = root.path().join("remote.git");
    std::fs::create_dir(&remote).expect("create remote dir");
    git(&remote, &["init", "--bare", "--initial-branch", branch, "."]);

    let seed = root.path().join("seed");
    std::fs::create_dir(&seed).expect("create seed dir");
    git(&seed, &["init", "--initial-branch", branch, "."]);
    git(&seed, &["config", "user.name", "Seed"]);
    git(&seed, &["config", "user.email", "seed@localhost"]);
    std::fs::write(seed.join("README.md"), "seed\n").expect("write seed file");
    git(&seed, &["add", "README.md"]);
    git(&seed, &["commit", "-m", "seed"]);
    git(
        &seed,
        &["push", remote.to_str().unwrap(), &format!("HEAD:{branch}")],
    );

    (root, remote)
}

/// Remote whose default branch is `master` and whose `main` holds unrelated
/// history, so a push to `main` is rejected as non-fast-forward.
fn seed_remote_rejecting_main() -> (TempDir, PathBuf) {
    let (root, remote) = seed_remote("master");

    let diverged = root.path().join("diverged");
    std::fs::create_dir(&diverged).expect("create diverged dir");
    git(&diverged, &["init", "--initial-branch", "main", "."]);
    git(&diverged, &["config", "user.name", "Seed"]);
    git(&diverged, &["config", "user.email", "seed@localhost"]);
    std::fs::write(diverged.join("OTHER.md"), "diverged\n").expect("write diverged file");
    git(&diverged, &["add", "OTHER.md"]);
    git(&diverged, &["commit", "-m", "diverged history"]);
    git(&diverged, &["push", remote.to_str().unwrap(), "HEAD:main"]);

    (root, remote)
}

fn publish_config(remote: &Path) -> PublishConfig {
    PublishConfig {
        remote: GistRemote::parse(remote.to_str().unwrap()),
        owner: "alice".to_string(),
        committer_name: "gist-drop".to_string(),
        committer_email: "gist-drop@localhost".to_string(),
        commit_message: "Add files via gist-drop".to_string(),
    }
}

#[tokio::test]
async fn test_publish_advances_remote_main_by_one_commit() {
    let (_root, remote) = seed_remote("main");
    let config = publish_config(&remote);
    let vcs = GitCli::default();
    let before = git(&remote, &["rev-parse", "main"]);

    let files = vec![IncomingFile {
        name: "notes.txt".to_string(),
        content: b"hello".to_vec(),
    }];
    let report = publish(&config, &vcs, &files)
        .await
        .expect("publish should succeed");

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.commit.as_str().len(), 40);
    assert!(
        report.files[0]
            .raw_url
            .ends_with(&format!("/raw/{}/notes.txt", report.commit)),
        "link is content-addressed: {}",
        report.files[0].raw_url
    );

    let after = git(&remote, &["rev-parse", "main"]);
    assert_ne!(before, after, "remote main advanced");
    assert_eq!(after, report.commit.as_str());
    assert_eq!(
        git(&remote, &["rev-list", "--count", &format!("{before}..{after}")]),
        "1",
        "exactly one new commit"
    );
    assert_eq!(git(&remote, &["show", "main:notes.txt"]), "hello");
}

#[tokio::test]
async fn test_publish_falls_back_to_master_without_moving_main() {
    let (_root, remote) = seed_remote_rejecting_main();
    let config = publish_config(&remote);
    let vcs = GitCli::default();
    let main_before = git(&remote, &["rev-parse", "main"]);
    let master_before = git(&remote, &["rev-parse", "master"]);

    let files = vec![IncomingFile {
        name: "notes.txt".to_string(),
        content: b"hello".to_vec(),
    }];
    let report = publish(&config, &vcs, &files)
        .await
        .expect("fallback publish should succeed");

    assert_eq!(
        git(&remote, &["rev-parse", "main"]),
        main_before,
        "main is untouched"
    );
    let master_after = git(&remote, &["rev-parse", "master"]);
    assert_ne!(master_before, master_after, "master advanced");
    assert_eq!(master_after, report.commit.as_str());
    assert_eq!(git(&remote, &["show", "master:notes.txt"]), "hello");
}

#[tokio::test]
async fn test_two_publishes_yield_distinct_hashes() {
    let (_root, remote) = seed_remote("main");
    let config = publish_config(&remote);
    let vcs = GitCli::default();

    let first = publish(
        &config,
        &vcs,
        &[IncomingFile {
            name: "one.txt".to_string(),
            content: b"one".to_vec(),
        }],
    )
    .await
    .expect("first publish should succeed");

    let second = publish(
        &config,
        &vcs,
        &[IncomingFile {
            name: "two.txt".to_string(),
            content: b"two".to_vec(),
        }],
    )
    .await
    .expect("second publish should succeed");

    assert_ne!(first.commit, second.commit);
    assert!(
        second
            .files
            .iter()
            .all(|f| !f.raw_url.contains(first.commit.as_str())),
        "second response never references the first hash"
    );
}
