//! Integration tests driving the ransom binary end to end.
//!
//! Every test gets its own app data directory through `RANSOM_HOME`, so
//! cached indexes never leak between tests or into the user's real cache.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Fixture {
    home: TempDir,
    corpus: PathBuf,
    _corpus_dir: TempDir,
}

/// Small card corpus with one record outside the default language filter
fn fixture() -> Fixture {
    let corpus_dir = TempDir::new().unwrap();
    let corpus = corpus_dir.path().join("cards.json");
    fs::write(
        &corpus,
        r#"[
  {"name": "Ratchet Bomb", "oracle_text": "Tap: add a charge counter.", "lang": "en"},
  {"name": "Please Wait", "lang": "en"},
  {"name": "Xyzzy", "lang": "fr"}
]"#,
    )
    .unwrap();

    Fixture {
        home: TempDir::new().unwrap(),
        corpus,
        _corpus_dir: corpus_dir,
    }
}

fn ransom(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ransom"))
        .args(args)
        .env("RANSOM_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run ransom")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_index_then_stats() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    let output = ransom(fx.home.path(), &["index", corpus]);
    assert!(output.status.success(), "index failed: {:?}", output);
    assert!(stdout(&output).contains("Index stored at:"));

    let output = ransom(fx.home.path(), &["stats", corpus]);
    assert!(output.status.success(), "stats failed: {:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Records:          2"));
    assert!(text.contains("oracle_text"));
}

#[test]
fn test_decompose_json() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    let output = ransom(fx.home.path(), &["decompose", "--json", corpus, "Pls", "chet!"]);
    assert!(output.status.success(), "decompose failed: {:?}", output);

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["word"], "pls");
    assert_eq!(results[1]["word"], "chet");

    let texts: Vec<&str> = results[0]["fragments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["pl", "s"]);

    let chet = &results[1]["fragments"][0];
    assert_eq!(chet["text"], "chet");
    assert_eq!(chet["locations"][0]["record_id"], 0);
    assert_eq!(chet["locations"][0]["field_id"], 0);
}

#[test]
fn test_decompose_plain_output() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    let output = ransom(fx.home.path(), &["decompose", "--no-color", corpus, "wait"]);
    assert!(output.status.success(), "decompose failed: {:?}", output);
    assert!(stdout(&output).contains("#1 name: please wait"));
}

#[test]
fn test_decompose_unsourceable_fails() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    // The only record with x, y and z is filtered out by language
    let output = ransom(fx.home.path(), &["decompose", corpus, "xyz"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found anywhere in corpus"));
}

#[test]
fn test_language_override_includes_more_records() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    let output = ransom(
        fx.home.path(),
        &["decompose", "--json", "--languages", "en,fr", corpus, "xyz"],
    );
    assert!(output.status.success(), "decompose failed: {:?}", output);

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["fragments"][0]["text"], "xyz");
    assert_eq!(results[0]["fragments"][0]["locations"][0]["record_id"], 2);
}

#[test]
fn test_list_and_remove() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    let output = ransom(fx.home.path(), &["list"]);
    assert!(stdout(&output).contains("No indexed corpora found."));

    assert!(ransom(fx.home.path(), &["index", corpus]).status.success());

    let output = ransom(fx.home.path(), &["list"]);
    let canonical = fx.corpus.canonicalize().unwrap();
    assert!(stdout(&output).contains(&canonical.display().to_string()));

    let output = ransom(fx.home.path(), &["remove", corpus]);
    assert!(stdout(&output).contains("Removed index for:"));

    let output = ransom(fx.home.path(), &["remove", corpus]);
    assert!(stdout(&output).contains("No index found for:"));
}

#[test]
fn test_config_init_writes_defaults() {
    let fx = fixture();

    let output = ransom(fx.home.path(), &["config", "--init"]);
    assert!(output.status.success());

    let written = fs::read_to_string(fx.home.path().join("config.json")).unwrap();
    let config: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(config["match_limit"], 20);
    assert_eq!(config["field_names"][0], "name");
}

#[test]
fn test_decompose_shuffle_is_seeded() {
    let fx = fixture();
    let corpus = fx.corpus.to_str().unwrap();

    let locations = |args: &[&str]| -> Vec<Value> {
        let output = ransom(fx.home.path(), args);
        assert!(output.status.success(), "decompose failed: {:?}", output);
        let results: Value = serde_json::from_slice(&output.stdout).unwrap();
        results[0]["fragments"][0]["locations"].as_array().unwrap().clone()
    };

    let plain = locations(&["decompose", "--json", corpus, "a"]);
    let first = locations(&["decompose", "--json", "--shuffle", "--seed", "3", corpus, "a"]);
    let second = locations(&["decompose", "--json", "--shuffle", "--seed", "3", corpus, "a"]);

    assert_eq!(first, second);
    assert_eq!(first.len(), plain.len());
    for location in &plain {
        assert!(first.contains(location));
    }
}
