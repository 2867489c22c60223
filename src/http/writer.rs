use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::error::WriteError;
use crate::http::headers::Headers;
use crate::http::response::StatusCode;

/// Position of a [`ResponseWriter`] in the response sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Done,
}

/// Writes one response onto `W`, enforcing status line, headers, body order.
///
/// The body is either a single [`write_body`](Self::write_body) call or any
/// number of [`write_chunked_body`](Self::write_chunked_body) calls closed by
/// [`write_chunked_body_done`](Self::write_chunked_body_done). A call made in
/// the wrong state fails with [`WriteError::OutOfOrder`] and leaves the
/// writer untouched.
pub struct ResponseWriter<W> {
    inner: W,
    state: WriterState,
    chunked: bool,
    declared_trailers: Vec<String>,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            state: WriterState::StatusLine,
            chunked: false,
            declared_trailers: Vec::new(),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == WriterState::Done
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.expect(WriterState::StatusLine)?;
        self.inner.write_all(status.status_line().as_bytes()).await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect(WriterState::Headers)?;

        let mut buf = BytesMut::new();
        put_fields(&mut buf, headers);
        buf.put_slice(b"\r\n");
        self.inner.write_all(&buf).await?;

        self.declared_trailers = headers
            .get("Trailer")
            .map(|v| v.split(',').map(|s| s.trim().to_ascii_lowercase()).collect())
            .unwrap_or_default();
        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes a fixed-length body and finishes the response.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.expect(WriterState::Body)?;
        if self.chunked {
            return Err(WriteError::OutOfOrder {
                expected: WriterState::Body,
                actual: self.state,
            });
        }

        self.inner.write_all(body).await?;
        self.inner.flush().await?;
        self.state = WriterState::Done;
        Ok(body.len())
    }

    /// Writes one `<hex-length>\r\n<bytes>\r\n` chunk.
    ///
    /// An empty slice writes nothing: a zero-length chunk would end the body.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriteError> {
        self.expect(WriterState::Body)?;
        if chunk.is_empty() {
            return Ok(0);
        }

        let mut buf = BytesMut::with_capacity(chunk.len() + 12);
        buf.put_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        buf.put_slice(chunk);
        buf.put_slice(b"\r\n");
        self.inner.write_all(&buf).await?;

        self.chunked = true;
        Ok(chunk.len())
    }

    /// Writes the terminal zero-length chunk, `trailers`, and the final CRLF.
    pub async fn write_chunked_body_done(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        self.expect(WriterState::Body)?;

        for (name, _) in trailers.iter() {
            if !self.declared_trailers.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                tracing::warn!(trailer = name, "Trailer was not announced in the Trailer header");
            }
        }

        let mut buf = BytesMut::new();
        buf.put_slice(b"0\r\n");
        put_fields(&mut buf, trailers);
        buf.put_slice(b"\r\n");
        self.inner.write_all(&buf).await?;
        self.inner.flush().await?;

        self.state = WriterState::Done;
        Ok(())
    }

    fn expect(&self, expected: WriterState) -> Result<(), WriteError> {
        if self.state != expected {
            return Err(WriteError::OutOfOrder {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

fn put_fields(buf: &mut BytesMut, headers: &Headers) {
    for (name, value) in headers.iter() {
        buf.put_slice(name.as_bytes());
        buf.put_u8(b':');
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }
}
