//! Tests of the `queryflow` binary: flags, exit codes and output streams.

use serde_json::json;
use std::io::Write;
use std::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn queryflow() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_queryflow"));
    command
        .env_remove("QF_HOST")
        .env_remove("QF_KEY")
        .env_remove("QF_DEPLOYMENT")
        .env_remove("RUST_LOG");
    command
}

#[test]
fn test_version_matches_cargo_toml() {
    let output = queryflow()
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "Version flag should exit with code 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim().strip_prefix("queryflow "),
        Some(env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_help_needs_no_environment() {
    let output = queryflow().arg("--help").output().expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--processor-id"));
    assert!(stdout.contains("QF_HOST"));
}

#[test]
fn test_invalid_arguments_exit_with_usage() {
    let output = queryflow()
        .args(["--sequence", "s.json", "--stream"])
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--stream cannot be combined with --sequence"));
    assert!(stderr.contains("Usage:"));
}

#[test]
fn test_missing_host_is_reported() {
    let output = queryflow()
        .args(["--processor-id", "abc"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("QF_HOST"));
}

#[tokio::test]
async fn test_execute_prints_result() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/sandbox/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": 1})))
        .mount(&mock_server)
        .await;

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_queryflow"))
        .env("QF_HOST", mock_server.uri())
        .env("QF_KEY", "key")
        .env_remove("QF_DEPLOYMENT")
        .args(["--sandbox", "--processor-id", "abc", "--input", r#"{"q": 1}"#])
        .output()
        .await
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({"answer": 1}));
}

#[tokio::test]
async fn test_sequence_failure_prints_body_and_exits_1() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/inference/first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 1})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/inference/second"))
        .respond_with(ResponseTemplate::new(422).set_body_string(r#"{"message":"bad n"}"#))
        .mount(&mock_server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"steps": [{{"processor": "first"}}, {{"processor": "second"}}]}}"#)
        .unwrap();

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_queryflow"))
        .env("QF_HOST", mock_server.uri())
        .env("QF_KEY", "key")
        .env_remove("QF_DEPLOYMENT")
        .env("RUST_LOG", "off")
        .arg("--sequence")
        .arg(file.path())
        .output()
        .await
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.trim(), r#"{"message":"bad n"}"#);
}
