//! End-to-end tests of the connection state machine over in-memory streams

use std::fs;
use std::sync::Arc;

use portico::http::connection::{Connection, handle_request};
use portico::http::response::{Response, StatusCode};
use portico::resolve::{Outcome, RedirectTable, Resolver};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const OK_HI: &[u8] = b"HTTP/1.1 200 OK\r\nConnection: keep-alive\r\nContent-type: application/octet-stream\r\nContent-length: 2\r\n\r\nhi";

fn resolver(name: &str) -> Resolver {
    let root = std::env::temp_dir().join(format!("portico-conn-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("index.html"), b"hi").unwrap();

    Resolver::new(
        root.to_string_lossy().into_owned(),
        RedirectTable::parse("/moved\tother\t8000\n"),
    )
}

/// Feeds `chunks` to a fresh connection, half-closes, and collects everything
/// the server writes back.
async fn exchange(resolver: Resolver, max_request_size: usize, chunks: &[&[u8]]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, Arc::new(resolver), max_request_size);
        conn.run().await
    });

    for chunk in chunks {
        client.write_all(chunk).await.unwrap();
        tokio::task::yield_now().await;
    }
    let _ = client.shutdown().await;

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    handle.await.unwrap().unwrap();
    out
}

#[tokio::test]
async fn test_get_existing_file() {
    let out = exchange(resolver("get"), 1024, &[b"GET /index.html HTTP/1.1\r\n\r\n"]).await;

    assert_eq!(out, OK_HI.to_vec());
}

#[tokio::test]
async fn test_head_omits_body() {
    let out = exchange(resolver("head"), 1024, &[b"HEAD /index.html HTTP/1.1\r\n\r\n"]).await;

    assert_eq!(
        out,
        b"HTTP/1.1 200 OK\r\nConnection: keep-alive\r\nContent-type: application/octet-stream\r\nContent-length: 2\r\n\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_request_split_across_reads() {
    let out = exchange(
        resolver("split"),
        1024,
        &[b"GET /index", b".html HTTP/1.1\r", b"\n\r", b"\n"],
    )
    .await;

    assert_eq!(out, OK_HI.to_vec());
}

#[tokio::test]
async fn test_pipelined_requests_answered_in_order() {
    let out = exchange(
        resolver("pipeline"),
        1024,
        &[b"GET /index.html HTTP/1.1\r\n\r\nGET /moved HTTP/1.1\r\n\r\nGET /nope HTTP/1.1\r\n\r\n"],
    )
    .await;

    let mut expected = OK_HI.to_vec();
    expected.extend_from_slice(
        b"HTTP/1.1 302 Found\r\nConnection: keep-alive\r\nLocation: http://other:8000/moved\r\nContent-length: 0\r\n\r\n",
    );
    expected.extend_from_slice(
        b"HTTP/1.1 404 Not Found\r\nConnection: keep-alive\r\nContent-length: 0\r\n\r\n",
    );
    assert_eq!(out, expected);
}

#[tokio::test]
async fn test_repeated_get_is_identical() {
    let out = exchange(
        resolver("idempotent"),
        1024,
        &[b"GET /index.html HTTP/1.1\r\n\r\n", b"GET /index.html HTTP/1.1\r\n\r\n"],
    )
    .await;

    assert_eq!(out.len(), OK_HI.len() * 2);
    assert_eq!(&out[..OK_HI.len()], &out[OK_HI.len()..]);
}

#[tokio::test]
async fn test_unsupported_method_closes_and_drops_pipeline() {
    let out = exchange(
        resolver("not-impl"),
        1024,
        &[b"POST /index.html HTTP/1.1\r\nConnection: keep-alive\r\n\r\nGET /index.html HTTP/1.1\r\n\r\n"],
    )
    .await;

    assert_eq!(
        out,
        b"HTTP/1.1 501 Not Implemented\r\nConnection: close\r\nContent-length: 0\r\n\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_malformed_request_closes() {
    let out = exchange(
        resolver("malformed"),
        1024,
        &[b"GET /index.html HTTP/1.1\r\nContent-Length: 3\r\n\r\nGET /index.html HTTP/1.1\r\n\r\n"],
    )
    .await;

    assert_eq!(
        out,
        b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\nContent-length: 0\r\n\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_client_requested_close() {
    let out = exchange(
        resolver("client-close"),
        1024,
        &[b"GET /index.html HTTP/1.1\r\nConnection: close\r\n\r\nGET /index.html HTTP/1.1\r\n\r\n"],
    )
    .await;

    assert_eq!(
        out,
        b"HTTP/1.1 200 OK\r\nConnection: close\r\nContent-type: application/octet-stream\r\nContent-length: 2\r\n\r\nhi".to_vec()
    );
}

#[tokio::test]
async fn test_oversized_request_is_rejected() {
    let out = exchange(
        resolver("oversized"),
        32,
        &[b"GET /index.html HTTP/1.1\r\nX-Padding: aaaaaaaaaaaaaaaa\r\n\r\n"],
    )
    .await;

    assert_eq!(
        out,
        b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\nContent-length: 0\r\n\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_disconnect_without_request() {
    let out = exchange(resolver("silent"), 1024, &[]).await;

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_partial_request_then_disconnect() {
    let out = exchange(resolver("partial"), 1024, &[b"GET /index.html HTTP/1.1\r\n"]).await;

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_handle_request_statuses() {
    let resolver = resolver("handle");

    let cases: [(&[u8], StatusCode); 6] = [
        (b"GET /index.html HTTP/1.1\r\n\r\n", StatusCode::Ok),
        (b"GET /moved HTTP/1.1\r\n\r\n", StatusCode::Found),
        (b"GET /../etc/passwd HTTP/1.1\r\n\r\n", StatusCode::NotFound),
        (b"PUT /index.html HTTP/1.1\r\n\r\n", StatusCode::NotImplemented),
        (b"GET /index.html HTTP/1.0\r\n\r\n", StatusCode::BadRequest),
        (
            b"DELETE / HTTP/1.1\r\nConnection: a\r\nConnection: b\r\n\r\n",
            StatusCode::BadRequest,
        ),
    ];

    for (block, status) in cases {
        let response = handle_request(block, &resolver).await;
        assert_eq!(response.status, status, "{:?}", String::from_utf8_lossy(block));
    }
}

#[tokio::test]
async fn test_non_utf8_header_value_is_served() {
    let out = exchange(
        resolver("latin1-agent"),
        1024,
        &[b"GET /index.html HTTP/1.1\r\nUser-Agent: caf\xe9\r\n\r\n"],
    )
    .await;

    assert_eq!(out, OK_HI.to_vec());
}

#[tokio::test]
async fn test_rejections_follow_their_outcomes() {
    let resolver = resolver("outcomes");

    let malformed = handle_request(b"GET / HTTP/1.0\r\nConnection: keep-alive\r\n\r\n", &resolver).await;
    let unsupported = handle_request(b"TRACE / HTTP/1.1\r\n\r\n", &resolver).await;

    assert_eq!(
        malformed,
        Response::from_outcome(Outcome::MalformedRequest, false, false)
    );
    assert_eq!(
        unsupported,
        Response::from_outcome(Outcome::NotImplemented, false, false)
    );
}
