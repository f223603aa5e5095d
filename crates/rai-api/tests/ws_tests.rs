//! Live-socket tests for the `WebSocket` echo endpoint.
//!
//! Each test spawns the full server on an ephemeral port and talks to
//! `/ws/stream` with a real `WebSocket` client.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use rai_api::server::ServerConfig;
use rai_api::startup::spawn_server;
use rai_api::state::AppState;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_tungstenite::tungstenite::Message;

async fn spawn() -> SocketAddr {
    let config = ServerConfig {
        host: String::from("127.0.0.1"),
        port: 0,
    };
    let (addr, _handle) = spawn_server(&config, Arc::new(AppState::new()))
        .await
        .unwrap();
    addr
}

#[tokio::test]
async fn test_ping_is_echoed() {
    let addr = spawn().await;
    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/stream"))
        .await
        .unwrap();

    socket.send(Message::Text(String::from("ping"))).await.unwrap();
    let reply = socket.next().await.unwrap().unwrap();
    assert_eq!(reply.into_text().unwrap(), "echo: ping");

    socket.close(None).await.unwrap();
}

#[tokio::test]
async fn test_replies_arrive_in_order() {
    let addr = spawn().await;
    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/stream"))
        .await
        .unwrap();

    for i in 0..20 {
        socket.send(Message::Text(format!("frame {i}"))).await.unwrap();
    }

    for i in 0..20 {
        let reply = socket.next().await.unwrap().unwrap();
        assert_eq!(reply.into_text().unwrap(), format!("echo: frame {i}"));
    }

    socket.close(None).await.unwrap();
}

#[tokio::test]
async fn test_health_over_tcp() {
    let addr = spawn().await;
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains(r#""status":"ok""#));
}
