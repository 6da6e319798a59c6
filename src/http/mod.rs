//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server: one request per connection, the
//! request line is the only part of the request that is read, and only `GET`
//! is served.
//!
//! # Architecture
//!
//! - **`connection`**: drives a single connection from parse to close
//! - **`parser`**: reads the request off the stream and parses the request line
//! - **`request`**: the parsed request and its method
//! - **`header`**: ordered response header queue
//! - **`response`**: status codes, body sources and response construction
//! - **`writer`**: serializes a response onto the stream
//! - **`static_files`**: maps request paths onto the served directory tree
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │ ← Read the request line
//!        └──────┬──────┘
//!               │ parse error ───────────────→ 400
//!               ▼
//!        ┌──────────────────┐
//!        │     Parsed       │ ← version != HTTP/1.1 → 505
//!        └──────┬───────────┘   method != GET    → 501
//!               │ GET
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← 200 / 404 / 500, then send
//!        └──────┬───────────┘
//!               │ Response sent (or send failed)
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use httpd::http::connection::Connection;
//! use httpd::http::static_files::StaticFiles;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let files = Arc::new(StaticFiles::new("www"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let files = Arc::clone(&files);
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, files).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod header;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod static_files;
pub mod writer;
