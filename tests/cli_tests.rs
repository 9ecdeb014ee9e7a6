//! Command-line tests for the wikipath binary
//!
//! Only offline paths are exercised here: argument handling, URL resolution
//! and dry runs. Nothing talks to Wikipedia.

use std::process::{Command, Output};

fn wikipath(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wikipath"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run wikipath")
}

#[test]
fn test_dry_run_with_urls() {
    let output = wikipath(&[
        "--dry-run",
        "https://en.wikipedia.org/wiki/Funk",
        "https://en.wikipedia.org/wiki/Disc_jockey",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("https://en.wikipedia.org/wiki/Funk"));
    assert!(stderr.contains("https://en.wikipedia.org/wiki/Disc_jockey"));
    assert!(stderr.contains("https://en.wikipedia.org/w/api.php"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_dry_run_with_bare_titles() {
    let output = wikipath(&["--dry-run", "--language", "fi", "-t", "4", "Fankki", "Disco"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("https://fi.wikipedia.org/wiki/Fankki"));
    assert!(stderr.contains("https://fi.wikipedia.org/w/api.php"));
    assert!(stderr.contains("workers per direction: 4"));
}

#[test]
fn test_invalid_url_fails() {
    let output = wikipath(&[
        "--dry-run",
        "htps://en.wikipedia.org/wiki/Funk",
        "https://en.wikipedia.org/wiki/Disc_jockey",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Not a valid Wikipedia article URL"), "stderr: {stderr}");
}

#[test]
fn test_different_wikis_fail() {
    let output = wikipath(&[
        "--dry-run",
        "https://en.wikipedia.org/wiki/Funk",
        "https://fi.wikipedia.org/wiki/Fankki",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("different wikis"), "stderr: {stderr}");
}

#[test]
fn test_missing_target_is_usage_error() {
    let output = wikipath(&["https://en.wikipedia.org/wiki/Funk"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_version() {
    let output = wikipath(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("wikipath "));
}
