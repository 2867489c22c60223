use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::error::Elapsed;

use crate::http::error::{ParseError, WriteError};
use crate::http::parser::{ParseOptions, read_request};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::handler::Handler;

/// Per-connection limits.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    /// Deadline for receiving a complete request
    pub read_timeout: Option<Duration>,
    /// Deadline for the handler to finish writing its response
    pub write_timeout: Option<Duration>,
    pub parse: ParseOptions,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            read_timeout: Some(Duration::from_secs(10)),
            write_timeout: Some(Duration::from_secs(30)),
            parse: ParseOptions::default(),
        }
    }
}

pub enum ConnectionState {
    Reading,
    Handling(Request),
    Rejecting(StatusCode),
    Closed,
}

/// Drives a single request/response exchange over `stream`.
pub struct Connection<S> {
    stream: S,
    options: ConnectionOptions,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, options: ConnectionOptions) -> Self {
        Self {
            stream,
            options,
            state: ConnectionState::Reading,
        }
    }

    /// Reads one request, dispatches it to `handler`, then closes.
    ///
    /// Client format errors are answered with 400 and internal parser
    /// errors with 500. Truncated streams and timeouts are closed silently.
    pub async fn run<H: Handler>(&mut self, handler: &H) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = self.read().await?;
                }

                ConnectionState::Handling(request) => {
                    self.dispatch(handler, &request).await;
                }

                ConnectionState::Rejecting(status) => {
                    let response = match status {
                        StatusCode::InternalServerError => Response::internal_error(),
                        _ => Response::bad_request(),
                    };
                    let mut writer = ResponseWriter::new(&mut self.stream);
                    if let Err(e) = response.write_to(&mut writer).await {
                        tracing::warn!(error = %e, "Failed to send error response");
                    }
                }

                ConnectionState::Closed => break,
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown failed");
        }
        Ok(())
    }

    async fn read(&mut self) -> anyhow::Result<ConnectionState> {
        let parse = self.options.parse;
        let result = with_timeout(
            self.options.read_timeout,
            read_request(&mut self.stream, &parse),
        )
        .await;

        let err = match result {
            Ok(Ok(request)) => return Ok(ConnectionState::Handling(request)),
            Ok(Err(e)) => e,
            Err(_) => {
                tracing::warn!("Timed out waiting for request");
                return Ok(ConnectionState::Closed);
            }
        };

        match (err.status(), err) {
            (Some(status), e) => {
                tracing::warn!(error = %e, status = status.as_u16(), "Rejecting malformed request");
                Ok(ConnectionState::Rejecting(status))
            }
            (None, ParseError::Io(e)) => Err(e.into()),
            (None, e) => {
                tracing::info!(error = %e, "Peer closed before sending a full request");
                Ok(ConnectionState::Closed)
            }
        }
    }

    async fn dispatch<H: Handler>(&mut self, handler: &H, request: &Request) {
        let mut writer = ResponseWriter::new(&mut self.stream);
        let result = with_timeout(self.options.write_timeout, handler.handle(&mut writer, request)).await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => match e.downcast_ref::<WriteError>() {
                Some(WriteError::OutOfOrder { .. } | WriteError::UnsupportedStatus(_)) => {
                    tracing::error!(error = %e, path = %request.target(), "Handler broke response framing");
                }
                _ => tracing::warn!(error = %e, path = %request.target(), "Handler failed"),
            },
            Err(_) => tracing::warn!(path = %request.target(), "Handler timed out"),
        }

        if writer.is_done() {
            tracing::info!(method = %request.method(), path = %request.target(), "Response complete");
        } else {
            tracing::warn!(
                state = ?writer.state(),
                path = %request.target(),
                "Handler returned before finishing the response"
            );
        }
    }
}

async fn with_timeout<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Elapsed> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}
