use assert_cmd::Command;

// Drives the compiled binary for the commands that don't need a live game.

#[test]
fn languages_lists_embedded_glossaries() {
    let output = Command::cargo_bin("lingo")
        .unwrap()
        .arg("languages")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("`es` - Spanish"));
    assert!(stdout.contains("`fr` - French"));
}

#[test]
fn random_word_rejects_unknown_language() {
    let output = Command::cargo_bin("lingo")
        .unwrap()
        .args(["random-word", "--lang", "tlh"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid language code `tlh`"));
}

#[test]
fn play_rejects_unknown_language() {
    let output = Command::cargo_bin("lingo")
        .unwrap()
        .args(["play", "--lang", "xx"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn unknown_vocabulary_fails() {
    let output = Command::cargo_bin("lingo")
        .unwrap()
        .args(["--vocabulary", "nope", "languages"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn play_ends_cleanly_when_input_closes() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("lingo")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["play", "--lang", "fr"])
        .write_stdin("")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Starting the word guessing game"));
    assert!(stdout.contains("Session Summary"));
}

#[test]
fn zero_timeout_is_rejected() {
    let output = Command::cargo_bin("lingo")
        .unwrap()
        .args(["--timeout", "0", "languages"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--timeout"));
}
