use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use serial_test::serial;

use gist_drop::config::Args;

#[test]
fn test_help_names_the_required_flags() {
    let mut cmd = Command::cargo_bin("gist-drop").expect("binary exists");

    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("--remote")
            .and(predicate::str::contains("--owner"))
            .and(predicate::str::contains("--listen")),
    );
}

#[test]
fn test_startup_fails_without_remote_and_owner() {
    let mut cmd = Command::cargo_bin("gist-drop").expect("binary exists");

    // A clean environment: neither flags nor GIST_DROP_* variables.
    cmd.env_clear().assert().failure().stderr(
        predicate::str::contains("--remote").and(predicate::str::contains("--owner")),
    );
}

#[test]
#[serial]
fn test_env_variables_stand_in_for_flags() {
    std::env::set_var("GIST_DROP_REMOTE", "git@gist.github.com:abc123.git");
    std::env::set_var("GIST_DROP_OWNER", "alice");

    let args = Args::try_parse_from(["gist-drop"]).expect("env supplies the required values");
    assert_eq!(args.remote, "git@gist.github.com:abc123.git");
    assert_eq!(args.owner, "alice");

    std::env::remove_var("GIST_DROP_REMOTE");
    std::env::remove_var("GIST_DROP_OWNER");
}

#[test]
#[serial]
fn test_flags_override_env_variables() {
    std::env::set_var("GIST_DROP_REMOTE", "git@gist.github.com:from-env.git");
    std::env::set_var("GIST_DROP_OWNER", "env-owner");

    let args = Args::try_parse_from([
        "gist-drop",
        "--remote",
        "git@gist.github.com:from-flag.git",
        "--owner",
        "flag-owner",
    ])
    .expect("flags parse");
    assert_eq!(args.remote, "git@gist.github.com:from-flag.git");
    assert_eq!(args.owner, "flag-owner");

    std::env::remove_var("GIST_DROP_REMOTE");
    std::env::remove_var("GIST_DROP_OWNER");
}
