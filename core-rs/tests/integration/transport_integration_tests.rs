// HttpTransport against a stub switch served by axum on an ephemeral port.
//
// Covers the three failure tiers as they come off the wire:
// - Connection: refused connection, request timeout
// - Protocol: non-2xx status, unreadable payload
// - Application: `status: "ERROR"` in the payload

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aswitch_core::{FailureClass, HttpTransport, SwitchTransport};

#[derive(Clone)]
enum Body {
    Json(Value),
    Text(&'static str),
}

struct Stub {
    ports_status: StatusCode,
    ports_body: Body,
    ports_delay: Duration,
    select_status: StatusCode,
    select_body: Value,
    selected: Mutex<Vec<u32>>,
}

impl Default for Stub {
    fn default() -> Self {
        Self {
            ports_status: StatusCode::OK,
            ports_body: Body::Json(json!({
                "0": {"label": "ANT1", "status": 1},
                "1": {"label": "ANT2", "status": 0}
            })),
            ports_delay: Duration::ZERO,
            select_status: StatusCode::OK,
            select_body: json!({"status": "OK", "msg": "ANT2 selected"}),
            selected: Mutex::new(Vec::new()),
        }
    }
}

async fn ports(State(stub): State<Arc<Stub>>) -> Response {
    if !stub.ports_delay.is_zero() {
        tokio::time::sleep(stub.ports_delay).await;
    }
    match &stub.ports_body {
        Body::Json(value) => (stub.ports_status, Json(value.clone())).into_response(),
        Body::Text(text) => (stub.ports_status, *text).into_response(),
    }
}

async fn select(State(stub): State<Arc<Stub>>, Path(index): Path<u32>) -> Response {
    stub.selected.lock().unwrap().push(index);
    (stub.select_status, Json(stub.select_body.clone())).into_response()
}

/// Serve `stub` and return its base URL
async fn serve(stub: Stub) -> (String, Arc<Stub>) {
    let stub = Arc::new(stub);
    let app = Router::new()
        .route("/api/v1/ports", get(ports))
        .route("/api/v1/select/{index}", get(select))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

fn class_of(err: &aswitch_core::SwitchError) -> Option<FailureClass> {
    err.failure_class()
}

#[tokio::test]
async fn list_ports_parses_listing() {
    let (url, _stub) = serve(Stub::default()).await;
    let transport = HttpTransport::new(&url).unwrap();

    let snapshot = transport.list_ports(Some(Duration::from_secs(2))).await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get(0).unwrap().label, "ANT1");
    assert_eq!(snapshot.selected(), vec![0]);
}

#[tokio::test]
async fn select_port_hits_index_endpoint() {
    let (url, stub) = serve(Stub::default()).await;
    let transport = HttpTransport::new(&url).unwrap();

    let result = transport.select_port(1).await.unwrap();

    assert!(result.ok);
    assert_eq!(result.message, "ANT2 selected");
    assert_eq!(*stub.selected.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn http_error_status_is_protocol_failure() {
    let (url, _stub) = serve(Stub {
        ports_status: StatusCode::INTERNAL_SERVER_ERROR,
        select_status: StatusCode::SERVICE_UNAVAILABLE,
        ..Stub::default()
    })
    .await;
    let transport = HttpTransport::new(&url).unwrap();

    let list_err = transport.list_ports(None).await.unwrap_err();
    assert_eq!(class_of(&list_err), Some(FailureClass::Protocol));
    assert!(list_err.to_string().contains("500"));

    let select_err = transport.select_port(0).await.unwrap_err();
    assert_eq!(class_of(&select_err), Some(FailureClass::Protocol));
}

#[tokio::test]
async fn unknown_endpoint_is_protocol_failure() {
    let (url, _stub) = serve(Stub::default()).await;
    // Wrong prefix: every call lands on a 404
    let transport = HttpTransport::new(&format!("{}/switch", url)).unwrap();

    let err = transport.list_ports(None).await.unwrap_err();
    assert_eq!(class_of(&err), Some(FailureClass::Protocol));
}

#[tokio::test]
async fn non_json_body_is_protocol_failure() {
    let (url, _stub) = serve(Stub {
        ports_body: Body::Text("<html>captive portal</html>"),
        ..Stub::default()
    })
    .await;
    let transport = HttpTransport::new(&url).unwrap();

    let err = transport.list_ports(None).await.unwrap_err();
    assert_eq!(class_of(&err), Some(FailureClass::Protocol));
}

#[tokio::test]
async fn error_marker_is_application_failure() {
    let (url, _stub) = serve(Stub {
        ports_body: Body::Json(json!({"status": "ERROR", "msg": "Relay board not responding"})),
        select_body: json!({"status": "ERROR", "msg": "Port 1 is locked"}),
        ..Stub::default()
    })
    .await;
    let transport = HttpTransport::new(&url).unwrap();

    let list_err = transport.list_ports(None).await.unwrap_err();
    assert_eq!(class_of(&list_err), Some(FailureClass::Application));
    assert_eq!(list_err.notice(), "Relay board not responding");

    let select_err = transport.select_port(1).await.unwrap_err();
    assert_eq!(class_of(&select_err), Some(FailureClass::Application));
    assert_eq!(select_err.notice(), "Port 1 is locked");
}

#[tokio::test]
async fn refused_connection_is_connection_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(&format!("http://{}", addr)).unwrap();

    let list_err = transport.list_ports(Some(Duration::from_secs(2))).await.unwrap_err();
    assert_eq!(class_of(&list_err), Some(FailureClass::Connection));
    assert!(list_err.is_recoverable());

    let select_err = transport.select_port(0).await.unwrap_err();
    assert_eq!(class_of(&select_err), Some(FailureClass::Connection));
}

#[tokio::test]
async fn slow_switch_is_connection_failure() {
    let (url, _stub) = serve(Stub {
        ports_delay: Duration::from_secs(5),
        ..Stub::default()
    })
    .await;
    let transport = HttpTransport::new(&url).unwrap();

    let err = transport.list_ports(Some(Duration::from_millis(100))).await.unwrap_err();
    assert_eq!(class_of(&err), Some(FailureClass::Connection));
}
