use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use httpd::http::static_files::StaticFiles;
use httpd::server::listener;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start(dir: &TempDir) -> SocketAddr {
    let tcp = listener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)).unwrap();
    let addr = tcp.local_addr().unwrap();
    let files = Arc::new(StaticFiles::new(dir.path()));
    tokio::spawn(listener::serve(tcp, files));
    addr
}

async fn request(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_serves_file_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    let addr = start(&dir).await;

    let response = request(addr, b"GET /notes.txt HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("\r\nContent-Length: 5\r\n"));
    assert!(response.contains("\r\nContent-Type: text/plain\r\n"));
    assert!(response.ends_with("\r\n\r\nhello"));
}

#[tokio::test]
async fn test_each_connection_gets_one_response() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<p>home</p>").unwrap();
    let addr = start(&dir).await;

    let (home, missing, post, bad) = tokio::join!(
        request(addr, b"GET / HTTP/1.1\r\n\r\n"),
        request(addr, b"GET /missing.html HTTP/1.1\r\n\r\n"),
        request(addr, b"POST / HTTP/1.1\r\n\r\n"),
        request(addr, b"XYZ"),
    );

    assert!(home.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(home.ends_with("<p>home</p>"));
    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(missing.ends_with("\r\n\r\n"));
    assert!(post.starts_with("HTTP/1.1 501 Not Implemented\r\n"));
    assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_rebinding_reused_address() {
    let first = listener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)).unwrap();
    let addr = match first.local_addr().unwrap() {
        SocketAddr::V4(addr) => addr,
        SocketAddr::V6(_) => unreachable!("bound an IPv4 socket"),
    };
    drop(first);

    assert!(listener::bind(addr).is_ok());
}
