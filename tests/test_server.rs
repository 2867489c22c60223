mod common;

use common::Echo;
use rawhttp::http::connection::ConnectionOptions;
use rawhttp::server::ConnectionCounter;
use rawhttp::server::listener::serve;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start() -> (std::net::SocketAddr, ConnectionCounter) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let counter = ConnectionCounter::new();

    tokio::spawn(serve(
        listener,
        ConnectionOptions::default(),
        Echo,
        counter.clone(),
    ));
    (addr, counter)
}

async fn send(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_server_answers_and_closes() {
    let (addr, _) = start().await;
    let response = send(addr, b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("GET /coffee 0"));
}

#[tokio::test]
async fn test_server_handles_concurrent_connections() {
    let (addr, counter) = start().await;

    let mut tasks = Vec::new();
    for i in 0..8 {
        tasks.push(tokio::spawn(async move {
            let request = format!("GET /n/{i} HTTP/1.1\r\n\r\n");
            send(addr, request.as_bytes()).await
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let response = task.await.unwrap();
        assert!(response.ends_with(&format!("GET /n/{i} 0")));
    }

    // guards drop once each task finishes
    for _ in 0..50 {
        if counter.live() == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(counter.live(), 0);
}
