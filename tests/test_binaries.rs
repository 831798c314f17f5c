//! Integration tests for the substream binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper to get the path to the compiled binary
fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_substream"))
}

/// Helper to create a test file with known content
fn create_test_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)
}

#[test]
fn test_help() {
    let output = Command::new(get_binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute substream");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Extract a byte range of a file"));
    assert!(stdout.contains("--offset"));
    assert!(stdout.contains("--length"));
}

#[test]
fn test_extract_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.txt");
    create_test_file(&input, b"test string").unwrap();

    let output = Command::new(get_binary_path())
        .arg(&input)
        .args(["--offset", "5", "--length", "3"])
        .output()
        .expect("Failed to execute substream");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"str");
}

#[test]
fn test_extract_rest_of_file_from_memory() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.txt");
    let out = temp_dir.path().join("out.txt");
    create_test_file(&input, b"test string").unwrap();

    let status = Command::new(get_binary_path())
        .arg(&input)
        .args(["--offset", "5", "--memory", "--output"])
        .arg(&out)
        .status()
        .expect("Failed to execute substream");

    assert!(status.success());
    assert_eq!(fs::read(&out).unwrap(), b"string");
}

#[test]
fn test_locator_and_stat() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.bin");
    create_test_file(&input, &[0u8; 100]).unwrap();

    let output = Command::new(get_binary_path())
        .arg("--locator")
        .arg(format!("substream://10:25/{}", input.display()))
        .arg("--stat")
        .output()
        .expect("Failed to execute substream");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "25");
}

#[test]
fn test_malformed_locator_fails() {
    let output = Command::new(get_binary_path())
        .args(["--locator", "substream://ten:5/x"])
        .output()
        .expect("Failed to execute substream");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid locator"));
}

#[test]
fn test_missing_input_fails() {
    let output = Command::new(get_binary_path())
        .arg("/nonexistent/input.bin")
        .args(["--length", "4"])
        .output()
        .expect("Failed to execute substream");

    assert!(!output.status.success());
}

#[test]
fn test_non_numeric_spill_threshold_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.txt");
    create_test_file(&input, b"test string").unwrap();

    let output = Command::new(get_binary_path())
        .arg(&input)
        .args(["--memory", "--spill-threshold", "abc"])
        .output()
        .expect("Failed to execute substream");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spill-threshold"));
}
