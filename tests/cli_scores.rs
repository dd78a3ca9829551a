use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use shadow_rush::ledger::{FileScoreStore, HighScoreEntry, ScoreStore};

// The --scores listing is the one surface that works without a TTY, so it
// is exercised against the real compiled binary.

#[test]
fn scores_flag_lists_the_persisted_ledger() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let store = FileScoreStore::with_path(&path);
    store
        .save(&[
            HighScoreEntry {
                score: 42,
                date: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            },
            HighScoreEntry {
                score: 7,
                date: Utc.timestamp_opt(1_700_000_100, 0).unwrap(),
            },
        ])
        .unwrap();

    let output = assert_cmd::Command::cargo_bin("shadow-rush")
        .unwrap()
        .arg("--scores")
        .arg("--store")
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("high scores"));
    assert!(stdout.contains("42"));
    assert!(stdout.contains(" 2. "));
}

#[test]
fn scores_flag_with_no_ledger_says_so() {
    let dir = tempdir().unwrap();

    let output = assert_cmd::Command::cargo_bin("shadow-rush")
        .unwrap()
        .arg("--scores")
        .arg("--store")
        .arg(dir.path().join("missing.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no high scores yet"));
}

#[test]
fn running_without_a_tty_fails_cleanly() {
    assert_cmd::Command::cargo_bin("shadow-rush")
        .unwrap()
        .assert()
        .failure();
}
