use assert_cmd::Command;
use predicates::prelude::*;

fn ytsentiment(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ytsentiment").unwrap();
    cmd.env_remove("YT_SENTIMENT_CONFIG")
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(config_dir.path().join("config.yaml"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("ytsentiment")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("transcript"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn analyze_rejects_non_youtube_input() {
    let dir = tempfile::tempdir().unwrap();

    ytsentiment(&dir)
        .args(["analyze", "https://vimeo.com/123456789", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube video ID or URL"));
}

#[test]
fn analyze_rejects_zero_chunk_size() {
    let dir = tempfile::tempdir().unwrap();

    ytsentiment(&dir)
        .args(["analyze", "SCwN0_ZXwec", "--chunk-size", "0", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunk_size"));
}

#[test]
fn config_show_writes_and_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();

    ytsentiment(&dir)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration:"))
        .stdout(predicate::str::contains("cardiffnlp/twitter-roberta-base-sentiment"))
        .stdout(predicate::str::contains("Chunk Size: 10 words"));

    assert!(dir.path().join("config.yaml").exists());
}

#[test]
fn invalid_output_format_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    ytsentiment(&dir)
        .args(["analyze", "SCwN0_ZXwec", "--format", "srt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("srt"));
}

#[test]
fn config_without_show_prints_location() {
    let dir = tempfile::tempdir().unwrap();

    ytsentiment(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Edit the configuration file at:"))
        .stdout(predicate::str::contains("config.yaml"))
        .stdout(predicate::str::contains("coming soon").not());
}

#[test]
fn invalid_default_format_in_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "app:\n  default_output_format: srt\n",
    )
    .unwrap();

    ytsentiment(&dir)
        .args(["analyze", "SCwN0_ZXwec", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_output_format"));
}
