//! `check_remote` against a live local instance.


use std::time::Duration;
use tollgate::client::check_remote;
use tollgate::report::ErrorKind;
use test_helpers::{spawn_test_server, unused_local_addr, LIVE_TOKEN, STALE_TOKEN};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_live_token_is_accepted_remotely() {
    let addr = spawn_test_server().await;
    let status = check_remote(&format!("http://{addr}"), LIVE_TOKEN, TIMEOUT)
        .await
        .expect("live token should pass");
    assert_eq!(status.label.as_deref(), Some("deploy"));
}

#[tokio::test]
async fn test_expired_token_maps_to_token_expired() {
    let addr = spawn_test_server().await;
    let err = check_remote(&format!("http://{addr}"), STALE_TOKEN, TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TokenExpired);
    assert!(err.to_string().ends_with(": stal****"));
    assert!(!err.to_string().contains(STALE_TOKEN));
}

#[tokio::test]
async fn test_unknown_token_maps_to_token_invalid() {
    let addr = spawn_test_server().await;
    let err = check_remote(&format!("http://{addr}/"), "nobody-knows", TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_closed_port_is_connection_refused() {
    let addr = unused_local_addr().await;
    let url = format!("http://{addr}");
    let err = check_remote(&url, LIVE_TOKEN, TIMEOUT).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerConnectionRefused);
    assert!(err.to_string().ends_with(&format!(": {url}")));
}

#[tokio::test]
async fn test_malformed_url_is_rejected_before_connecting() {
    let err = check_remote("localhost:3170", LIVE_TOKEN, TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidServerUrl);
    assert!(err.to_string().ends_with(": localhost:3170"));
}

#[tokio::test]
async fn test_unexpected_status_is_request_error() {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};

    let app = Router::new().route(
        "/v1/infra/token",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "error": { "code": "maintenance", "message": "down for maintenance" }
                })),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let err = check_remote(&format!("http://{addr}"), LIVE_TOKEN, TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestError);
    assert_eq!(err.to_string(), "down for maintenance");
}

#[tokio::test]
async fn test_truncated_error_body_is_request_error() {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0_u8; 1024];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial",
            );
        }
    });

    let err = check_remote(&format!("http://{addr}"), LIVE_TOKEN, TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestError);
    assert!(!err.to_string().is_empty());
}
