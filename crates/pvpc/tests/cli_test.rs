//! Integration tests for the `pvpc` CLI binary.
//!
//! Argument parsing, help output, config subcommands, and one-shot
//! collection against a wiremock price endpoint.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRICES_PATH: &str = "/es/datos/mercados/precios-mercados-tiempo-real";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pvpc` binary with env isolation.
///
/// Clears all `PVPC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn pvpc_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pvpc");
    cmd.env("HOME", "/tmp/pvpc-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/pvpc-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("PVPC_CONFIG")
        .env_remove("PVPC_OUTPUT")
        .env_remove("PVPC_API_URL")
        .env_remove("PVPC_TIME_TRUNC")
        .env_remove("PVPC_GEO_ID")
        .env_remove("PVPC_START_DATE")
        .env_remove("PVPC_END_DATE")
        .env_remove("PVPC_HTTP_TIMEOUT")
        .env_remove("PVPC_WINDOW_END");
    cmd
}

/// `collect` with a fixed range against `server`.
fn collect_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = pvpc_cmd();
    cmd.args([
        "--api-url",
        &server.uri(),
        "collect",
        "--start",
        "2021-12-26T00:00:00+01:00",
        "--end",
        "2021-12-26T23:00:00+01:00",
    ]);
    cmd
}

fn prices_body() -> serde_json::Value {
    json!({
        "included": [{
            "type": "PVPC (\u{20ac}/MWh)",
            "id": "1001",
            "attributes": {
                "title": "PVPC (\u{20ac}/MWh)",
                "values": [
                    { "value": 0.15, "percentage": 0.5, "datetime": "2021-12-26T00:00:00Z" },
                    { "value": 0.17, "percentage": 0.5, "datetime": "2021-12-26T01:00:00Z" }
                ]
            }
        }]
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = pvpc_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in output:\n{stderr}");
}

#[test]
fn test_help_flag() {
    pvpc_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("PVPC")
            .and(predicate::str::contains("collect"))
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("api-url").not()),
    );
}

#[test]
fn test_version_flag() {
    pvpc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pvpc"));
}

#[test]
fn test_completions_bash() {
    pvpc_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pvpc"));
}

#[test]
fn test_invalid_output_format() {
    pvpc_cmd()
        .args(["--output", "yaml", "collect"])
        .assert()
        .code(2);
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_config_sample() {
    pvpc_cmd()
        .args(["config", "sample"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("time_trunc = \"hour\"")
                .and(predicate::str::contains("geo_id = 8741"))
                .and(predicate::str::contains("http_timeout = \"10s\"")),
        );
}

#[test]
fn test_config_path_honours_flag() {
    pvpc_cmd()
        .args(["--config", "/tmp/somewhere/pvpc.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/somewhere/pvpc.toml"));
}

#[test]
fn test_config_show_defaults() {
    pvpc_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("time_trunc = \"hour\"")
                .and(predicate::str::contains("window_end = \"today\"")),
        );
}

#[test]
fn test_config_show_json_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "geo_id = 8\ntime_trunc = \"day\"\n").unwrap();

    let output = pvpc_cmd()
        .args(["--config", path.to_str().unwrap(), "-o", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["geo_id"], 8);
    assert_eq!(value["time_trunc"], "day");
}

#[test]
fn test_config_init_writes_sample_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let path_arg = path.to_str().unwrap();

    pvpc_cmd()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("geo_id = 8741"));

    pvpc_cmd()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    pvpc_cmd()
        .args(["--config", path_arg, "config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_missing_explicit_config_is_usage_error() {
    pvpc_cmd()
        .args(["--config", "/tmp/pvpc-cli-test-nonexistent/nope.toml", "config", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_config_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "http_timeout = \"0s\"\n").unwrap();

    pvpc_cmd()
        .args(["--config", path.to_str().unwrap(), "collect"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("http_timeout"));
}

#[test]
fn test_invalid_start_date_is_usage_error() {
    pvpc_cmd()
        .args(["collect", "--start", "yesterday", "--end", "2021-12-26T00:00:00Z"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("start_date"));
}

// ── Collection ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_collect_line_protocol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRICES_PATH))
        .and(query_param("geo_id", "8741"))
        .and(query_param("start_date", "2021-12-26T00:00"))
        .and(query_param("end_date", "2021-12-26T23:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prices_body()))
        .expect(1)
        .mount(&server)
        .await;

    collect_cmd(&server)
        .args(["--geo-id", "8741", "--output", "line"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "pvpc,geo_id=8741 price=0.15 1640476800000000000\n\
             pvpc,geo_id=8741 price=0.17 1640480400000000000\n",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collect_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRICES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(prices_body()))
        .mount(&server)
        .await;

    let output = collect_cmd(&server)
        .args(["--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let samples = value.as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["measurement"], "pvpc");
    assert_eq!(samples[1]["fields"]["price"], 0.17);
    assert!(samples[0]["tags"].as_object().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collect_empty_response_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "included": [] })))
        .mount(&server)
        .await;

    collect_cmd(&server)
        .args(["--output", "line"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collect_decode_failure_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    collect_cmd(&server)
        .args(["--output", "line"])
        .assert()
        .code(9)
        .stdout(predicate::str::is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collect_server_error_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errors": [{ "code": 500, "status": "500", "title": "Internal error", "detail": "boom" }]
        })))
        .mount(&server)
        .await;

    collect_cmd(&server)
        .assert()
        .code(7)
        .stderr(predicate::str::contains("500"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collect_timeout_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prices_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    collect_cmd(&server)
        .args(["--timeout", "100ms"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("timed out"));
}

#[test]
fn test_collect_connection_refused_exit_code() {
    pvpc_cmd()
        .args(["--api-url", "http://127.0.0.1:1", "collect", "--timeout", "2s"])
        .assert()
        .code(7);
}
