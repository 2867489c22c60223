//! rawhttp - HTTP/1.1 over raw byte streams
//!
//! Incremental request parsing, framed response writing and a minimal
//! one-task-per-connection server.

pub mod config;
pub mod http;
pub mod server;
