//! Callback verification against local plain-HTTP endpoints.

use casview_transport::{
    CallbackRequest, CallbackTransport, CallbackTransportConfig, HttpCallbackTransport,
    TransportError,
};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle as TaskHandle;

/// Serve exactly one request with `status`, returning the request line.
fn serve_once(status_line: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).expect("read request");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response =
            format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        stream
            .write_all(response.as_bytes())
            .expect("write response");
        let text = String::from_utf8_lossy(&buf).to_string();
        text.lines().next().unwrap_or_default().to_string()
    });

    (format!("http://{addr}/pgt"), handle)
}

/// An endpoint that completes the TCP handshake but never answers.
fn silent_endpoint() -> (String, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");
    (format!("http://{addr}/pgt"), listener)
}

fn plain_http_config() -> CallbackTransportConfig {
    CallbackTransportConfig {
        require_https: false,
        connect_timeout_ms: 2_000,
        socket_timeout_ms: 2_000,
        ..CallbackTransportConfig::default()
    }
}

/// Start a verify call in the background and wait until it holds a slot.
async fn hold_slot(transport: &Arc<HttpCallbackTransport>, url: &str) -> TaskHandle<()> {
    let before = transport.in_flight();
    let task = {
        let transport = Arc::clone(transport);
        let request = CallbackRequest::new(url);
        tokio::spawn(async move {
            let _ = transport.verify(&request).await;
        })
    };

    let deadline = Instant::now() + Duration::from_secs(5);
    while transport.in_flight() == before {
        assert!(Instant::now() < deadline, "background call never took a slot");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    task
}

#[tokio::test]
async fn accepted_status_verifies_and_sends_ticket_parameters() {
    let (url, server) = serve_once("200 OK");
    let transport = HttpCallbackTransport::new(plain_http_config()).unwrap();

    let outcome = transport
        .verify(&CallbackRequest::new(url).with_ticket("PGT-1-abc", "PGTIOU-1-xyz"))
        .await
        .unwrap();

    assert_eq!(outcome.status, 200);
    assert!(outcome.accepted);
    assert_eq!(transport.in_flight(), 0);

    let request_line = server.join().unwrap();
    assert!(request_line.starts_with("GET /pgt?"), "{request_line}");
    assert!(request_line.contains("pgtIou=PGTIOU-1-xyz"), "{request_line}");
    assert!(request_line.contains("pgtId=PGT-1-abc"), "{request_line}");
}

#[tokio::test]
async fn rejected_status_is_an_outcome_not_an_error() {
    let (url, server) = serve_once("404 Not Found");
    let transport = HttpCallbackTransport::new(plain_http_config()).unwrap();

    let outcome = transport.verify(&CallbackRequest::new(url)).await.unwrap();
    assert_eq!(outcome.status, 404);
    assert!(!outcome.accepted);
    server.join().unwrap();
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let (url, server) = serve_once("302 Found");
    let transport = HttpCallbackTransport::new(plain_http_config()).unwrap();

    let outcome = transport.verify(&CallbackRequest::new(url)).await.unwrap();
    assert_eq!(outcome.status, 302);
    assert!(!outcome.accepted);
    server.join().unwrap();
}

#[tokio::test]
async fn plain_http_refused_by_default() {
    let transport = HttpCallbackTransport::new(CallbackTransportConfig::default()).unwrap();
    let err = transport
        .verify(&CallbackRequest::new("http://127.0.0.1:9/pgt"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::InsecureEndpoint { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let transport = HttpCallbackTransport::new(plain_http_config()).unwrap();

    let err = transport
        .verify(&CallbackRequest::new(format!("http://{addr}/pgt")))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request { .. }), "{err}");
    assert_eq!(transport.in_flight(), 0);
}

#[tokio::test]
async fn slow_host_is_capped_per_host_without_starving_others() {
    let config = CallbackTransportConfig {
        max_total_connections: 4,
        max_connections_per_host: 1,
        pool_wait_timeout_ms: 200,
        socket_timeout_ms: 10_000,
        ..plain_http_config()
    };
    let transport = Arc::new(HttpCallbackTransport::new(config).unwrap());
    let (slow_url, _slow) = silent_endpoint();

    let held = hold_slot(&transport, &slow_url).await;

    let started = Instant::now();
    let err = transport
        .verify(&CallbackRequest::new(slow_url.as_str()))
        .await
        .unwrap_err();
    let waited = started.elapsed();
    assert!(
        matches!(err, TransportError::PoolExhausted { per_host_capacity: 1, .. }),
        "{err}"
    );
    assert!(waited >= Duration::from_millis(150), "{waited:?}");
    assert!(waited < Duration::from_secs(5), "{waited:?}");
    assert_eq!(transport.in_flight(), 1);

    let (fast_url, server) = serve_once("200 OK");
    let outcome = transport
        .verify(&CallbackRequest::new(fast_url))
        .await
        .unwrap();
    assert!(outcome.accepted);
    server.join().unwrap();

    held.abort();
    let _ = held.await;
    assert_eq!(transport.in_flight(), 0);
}

#[tokio::test]
async fn exhausted_total_budget_fails_within_pool_wait() {
    let config = CallbackTransportConfig {
        max_total_connections: 1,
        max_connections_per_host: 1,
        pool_wait_timeout_ms: 200,
        socket_timeout_ms: 10_000,
        ..plain_http_config()
    };
    let transport = Arc::new(HttpCallbackTransport::new(config).unwrap());
    let (first_url, _first) = silent_endpoint();
    let (second_url, _second) = silent_endpoint();

    let held = hold_slot(&transport, &first_url).await;

    let started = Instant::now();
    let err = transport
        .verify(&CallbackRequest::new(second_url))
        .await
        .unwrap_err();
    let waited = started.elapsed();
    match err {
        TransportError::PoolExhausted {
            capacity,
            waited_ms,
            ..
        } => {
            assert_eq!(capacity, 1);
            assert_eq!(waited_ms, 200);
        }
        other => panic!("expected exhausted pool, got {other}"),
    }
    assert!(waited >= Duration::from_millis(150), "{waited:?}");
    assert!(waited < Duration::from_secs(5), "{waited:?}");

    held.abort();
    let _ = held.await;
    assert_eq!(transport.in_flight(), 0);
}
