//! Black-box tests of the `wordsmith` binary that need no network access:
//! the credential guard and the offline `stats` command.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn wordsmith_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("wordsmith");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let dataset_dir = root.join("dataset");
    fs::create_dir_all(&dataset_dir).unwrap();
    fs::write(dataset_dir.join("a.txt"), "Wordsmith builds tools.").unwrap();

    let config_content = format!(
        r#"[storage]
db_path = "{root}/data/wordsmith.db"

[dataset]
path = "{root}/dataset"

[chunking]
chunk_size = 512
chunk_overlap = 50
"#,
        root = root.display()
    );

    let config_path = root.join("wordsmith.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_wordsmith(
    config_path: &Path,
    args: &[&str],
    api_key: Option<&str>,
) -> (String, String, Option<i32>) {
    let binary = wordsmith_binary();
    let mut cmd = Command::new(&binary);
    cmd.arg("--config").arg(config_path).args(args);

    match api_key {
        Some(key) => {
            cmd.env("OPENAI_API_KEY", key);
        }
        None => {
            cmd.env_remove("OPENAI_API_KEY");
        }
    }

    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("Failed to run wordsmith binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

#[test]
fn test_missing_api_key_exits_with_code_1() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, code) = run_wordsmith(&config_path, &["stats"], None);
    assert_eq!(code, Some(1), "missing credential must exit 1");
    assert!(
        stderr.contains("OPENAI_API_KEY"),
        "error should name the variable, got: {}",
        stderr
    );
}

#[test]
fn test_missing_api_key_guards_default_chat_mode() {
    let (_tmp, config_path) = setup_test_env();

    // No subcommand: chat mode is selected, but the guard fires first
    let (_, stderr, code) = run_wordsmith(&config_path, &[], None);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("OPENAI_API_KEY"));
}

#[test]
fn test_stats_on_fresh_collection() {
    let (_tmp, config_path) = setup_test_env();

    // stats only reads local state; a placeholder key passes the guard
    let (stdout, stderr, code) = run_wordsmith(&config_path, &["stats"], Some("sk-test"));
    assert_eq!(code, Some(0), "stats failed: {}", stderr);
    assert!(stdout.contains("wordsmith_rag_demo_index"));
    assert!(stdout.contains("documents: 0"));
    assert!(stdout.contains("vectors:   0"));
}

#[test]
fn test_stats_is_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout1, _, code1) = run_wordsmith(&config_path, &["stats"], Some("sk-test"));
    let (stdout2, _, code2) = run_wordsmith(&config_path, &["stats"], Some("sk-test"));
    assert_eq!(code1, Some(0));
    assert_eq!(code2, Some(0));
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_invalid_chunk_flags_rejected() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, code) = run_wordsmith(
        &config_path,
        &["--chunk-size", "10", "--chunk-overlap", "10", "stats"],
        Some("sk-test"),
    );
    assert_ne!(code, Some(0), "overlap >= size must be rejected");
    assert!(
        stderr.contains("chunk_overlap"),
        "should mention chunk_overlap, got: {}",
        stderr
    );
}
