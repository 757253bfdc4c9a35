//! End-to-end tests for the aswitch binary
//!
//! Runs the built binary against a stub switch served by axum and checks the
//! process contract: which URL wins, and the exit status for a fatal startup
//! error and for a quit before the switch answered.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::io::Write;
use std::process::{Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_aswitch");

// Nothing listens there; connections are refused right away
const DEAD_URL: &str = "http://127.0.0.1:1";

struct Stub {
    status: StatusCode,
    hits: AtomicUsize,
}

async fn ports(State(stub): State<Arc<Stub>>) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    if stub.status.is_success() {
        Json(json!({
            "0": {"label": "ANT1", "status": 1},
            "1": {"label": "ANT2", "status": 0}
        }))
        .into_response()
    } else {
        (stub.status, "relay board on fire").into_response()
    }
}

async fn serve(status: StatusCode) -> (String, Arc<Stub>) {
    let stub = Arc::new(Stub {
        status,
        hits: AtomicUsize::new(0),
    });
    let app = Router::new()
        .route("/api/v1/ports", get(ports))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

fn settings_file(base_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "baseUrl: {}", base_url).unwrap();
    writeln!(file, "retryDelayMs: 200").unwrap();
    file
}

/// Run the binary with stdin closed, killing it if it hangs
async fn run_aswitch(args: &[&str]) -> Output {
    let child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to start aswitch");

    let output = tokio::time::timeout(Duration::from_secs(20), child.wait_with_output())
        .await
        .expect("aswitch did not exit")
        .expect("Failed to wait for aswitch");

    if !output.status.success() {
        eprintln!("STDERR:\n{}", String::from_utf8_lossy(&output.stderr));
    }
    output
}

#[tokio::test]
async fn test_http_error_at_startup_exits_with_status_one() {
    let (url, stub) = serve(StatusCode::INTERNAL_SERVER_ERROR).await;

    let output = run_aswitch(&["--headless", "--url", &url]).await;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    // Reported once, not by every layer it crossed
    assert_eq!(stderr.matches("HTTP error: 500").count(), 1);
}

#[tokio::test]
async fn test_url_flag_overrides_settings_file() {
    let (url, stub) = serve(StatusCode::INTERNAL_SERVER_ERROR).await;
    let settings = settings_file(DEAD_URL);
    let config = settings.path().to_str().unwrap();

    // With the file's URL the headless binary would retry forever
    let output = run_aswitch(&["--headless", "--config", config, "--url", &url]).await;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("Switch URL: {}", url)));
    assert!(!stderr.contains(DEAD_URL));
}

#[tokio::test]
async fn test_settings_file_url_used_without_flag() {
    let (url, stub) = serve(StatusCode::OK).await;
    let settings = settings_file(&url);
    let config = settings.path().to_str().unwrap();

    // Closed stdin quits the console once the ports are shown
    let output = run_aswitch(&["--config", config]).await;

    assert!(output.status.success());
    assert!(stub.hits.load(Ordering::SeqCst) >= 1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ANT1"));
    assert!(stdout.contains("ANT2"));
}

#[tokio::test]
async fn test_quit_while_waiting_exits_with_status_zero() {
    let output = run_aswitch(&["--url", DEAD_URL]).await;

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Waiting for the switch to be turned on"));
    assert!(stderr.contains("bye bye"));
}

#[tokio::test]
async fn test_invalid_url_exits_with_status_one() {
    let output = run_aswitch(&["--headless", "--url", "ftp://aswitch.home"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"));
}
