//! HTTP/1.1 protocol implementation.
//!
//! One request and one response per connection; no keep-alive.
//!
//! # Architecture
//!
//! - **`headers`**: Ordered, case-insensitive header collection and line parser
//! - **`request`**: Request types and the incremental request state machine
//! - **`parser`**: Growable read buffer and the loop feeding the state machine
//! - **`response`**: Status codes, default header sets, buffered responses
//! - **`writer`**: Response writer enforcing status line, headers, body order
//! - **`connection`**: Per-connection driver tying the pieces together
//! - **`error`**: Parse and write error types
//!
//! # Request State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │   Initialized    │ ← Wait for the request line
//!        └──────┬───────────┘
//!               │ METHOD SP TARGET SP HTTP/1.1 CRLF
//!               ▼
//!        ┌──────────────────┐
//!        │  ParsingHeaders  │ ← One header line per step
//!        └──────┬───────────┘
//!               │ CRLF
//!               ▼
//!        ┌──────────────────┐
//!        │   ParsingBody    │ ← Content-Length bytes, or none
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │       Done       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rawhttp::http::connection::{Connection, ConnectionOptions};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, ConnectionOptions::default());
//!             if let Err(e) = conn.run(&MyHandler).await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
