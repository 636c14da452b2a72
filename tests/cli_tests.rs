//! Integration tests for the CLI. None of these reach the network: every
//! case stops at parsing, validation or the rate-limit gate.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn repo_seek(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-seek"));
    cmd.current_dir(dir.path())
        .env("REPO_SEEK_STATE_DIR", dir.path())
        .env("REPO_SEEK_API_URL", "http://127.0.0.1:9/search/repositories")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-seek"));
}

#[test]
fn test_cli_help_lists_filters() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--topic"))
        .stdout(predicate::str::contains("--created-before"))
        .stdout(predicate::str::contains("--output-format"));
}

#[test]
fn test_empty_query_is_rejected() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"))
        .stderr(predicate::str::contains("Search query cannot be empty"));

    repo_seek(&dir)
        .args(["--force", "--limit", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search query cannot be empty"));
}

#[test]
fn test_positional_words_are_an_empty_query() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .arg("rust")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"))
        .stderr(predicate::str::contains("Search query cannot be empty"));
}

#[test]
fn test_unknown_flag_is_a_parsing_error() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--topic", "cli", "--owner", "octo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parsing error"));
}

#[test]
fn test_too_many_components() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--topic", "a", "b", "c", "d", "e", "f", "g"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maximum of 6 components"));
}

#[test]
fn test_stars_min_above_max() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--stars-min", "20", "--stars-max", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "--stars-min cannot be greater than --stars-max",
        ));
}

#[test]
fn test_non_numeric_limit() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--topic", "cli", "--limit", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit must be a number."));
}

#[test]
fn test_limit_out_of_range() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--topic", "cli", "--limit", "501", "--output-format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("allowed range (1-500)"));
}

#[test]
fn test_invalid_leap_day() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--created-before", "2025-02-29"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--created-before is an invalid date"));
}

#[test]
fn test_order_without_sort() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--language", "rust", "--order", "asc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Order cannot be configured unless sorting criteria is specified.",
        ));
}

#[test]
fn test_output_name_requires_file_format() {
    let dir = TempDir::new().unwrap();
    repo_seek(&dir)
        .args(["--topic", "cli", "--output-name", "out.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot set output name when output format is stdout.",
        ));
}

#[test]
fn test_active_cooldown_blocks_before_any_request() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("repo-seek-rate-limit.json"),
        r#"{"remaining":0,"limit":10,"resetEpochSeconds":32503680000}"#,
    )
    .unwrap();

    repo_seek(&dir)
        .args(["--topic", "cli"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server error"))
        .stderr(predicate::str::contains(
            "The rate limit of 10 requests/min has been reached",
        ));
}

#[test]
fn test_corrupt_rate_limit_state_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("repo-seek-rate-limit.json"), "{").unwrap();

    repo_seek(&dir)
        .args(["--topic", "cli"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rate limit state unavailable"));
}

#[test]
fn test_cooldown_is_reported_before_validation_and_prompts() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("repo-seek-rate-limit.json"),
        r#"{"remaining":0,"limit":10,"resetEpochSeconds":32503680000}"#,
    )
    .unwrap();
    fs::write(dir.path().join("taken.json"), "[]").unwrap();

    // Would otherwise ask before overwriting taken.json
    repo_seek(&dir)
        .args(["--topic", "cli", "--output-format", "json", "--output-name", "taken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server error"))
        .stderr(predicate::str::contains("Please try again in"));

    // Would otherwise be an empty query
    repo_seek(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please try again in"))
        .stderr(predicate::str::contains("Search query cannot be empty").not());

    assert_eq!(fs::read_to_string(dir.path().join("taken.json")).unwrap(), "[]");
}

#[test]
fn test_log_filter_can_come_from_dotenv() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "RUST_LOG=debug\n").unwrap();

    repo_seek(&dir)
        .args(["--stars-min", "20", "--stars-max", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("StarsMinAboveMax"));
}
