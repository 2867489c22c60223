//! Driving loop that turns a byte stream into a [`Request`].

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::error::ParseError;
use crate::http::request::Request;

/// Default starting size of the parse buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Default ceiling for the parse buffer.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub initial_buffer_size: usize,
    pub max_buffer_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            initial_buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

/// Bytes read from the stream but not yet consumed by the parser.
///
/// The logical capacity doubles whenever unparsed bytes fill it. Consumed
/// bytes are advanced past, so they are never handed to the parser again.
#[derive(Debug)]
pub struct ReadBuffer {
    buf: BytesMut,
    capacity: usize,
    max: usize,
}

impl ReadBuffer {
    pub fn new(options: &ParseOptions) -> Self {
        let capacity = options.initial_buffer_size.max(1);
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            max: options.max_buffer_size.max(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn unparsed(&self) -> &[u8] {
        &self.buf
    }

    pub fn consume(&mut self, n: usize) {
        self.buf.advance(n);
    }

    /// Reads once from `reader` into the free space, growing first if full.
    ///
    /// Returns the number of bytes read; zero means end of stream.
    pub async fn fill_from<R>(&mut self, reader: &mut R) -> Result<usize, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        if self.buf.len() >= self.capacity {
            if self.capacity >= self.max {
                return Err(ParseError::TooLarge { limit: self.max });
            }
            self.capacity = (self.capacity * 2).min(self.max);
        }
        self.buf.reserve(self.capacity - self.buf.len());

        let room = (self.capacity - self.buf.len()) as u64;
        let n = (&mut *reader).take(room).read_buf(&mut self.buf).await?;
        Ok(n)
    }
}

/// Reads from `reader` until a complete request has been parsed.
///
/// Fails with [`ParseError::Incomplete`] if the stream ends first; a
/// truncated connection is never treated as an empty request.
pub async fn read_request<R>(reader: &mut R, options: &ParseOptions) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut request = Request::new();
    let mut buffer = ReadBuffer::new(options);

    while !request.is_done() {
        let n = buffer.fill_from(reader).await?;
        if n == 0 {
            return Err(ParseError::Incomplete {
                state: request.state(),
            });
        }

        let consumed = request.parse(buffer.unparsed())?;
        buffer.consume(consumed);
    }

    if !buffer.unparsed().is_empty() {
        tracing::debug!(
            leftover = buffer.unparsed().len(),
            "Ignoring bytes after complete request"
        );
    }

    tracing::debug!(
        method = %request.method(),
        target = %request.target(),
        body_len = request.body.len(),
        "Request parsed"
    );

    Ok(request)
}
