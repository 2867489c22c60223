#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use rawhttp::http::request::Request;
use rawhttp::http::response::{Response, StatusCode};
use rawhttp::http::writer::ResponseWriter;
use rawhttp::server::Handler;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Reader that hands out at most `chunk` bytes per read.
pub struct ChunkReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkReader {
    pub fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            chunk,
        }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let end = (self.pos + self.chunk)
            .min(self.data.len())
            .min(self.pos + buf.remaining());
        let start = self.pos;
        buf.put_slice(&self.data[start..end]);
        self.pos = end;
        Poll::Ready(Ok(()))
    }
}

/// Echoes method, target and body length back as a plain response.
pub struct Echo;

impl Handler for Echo {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let body = format!(
            "{} {} {}",
            request.method(),
            request.target(),
            request.body.len()
        );
        Response::ok(body).write_to(writer).await?;
        Ok(())
    }
}

/// Writes the status line and headers, then returns without a body.
pub struct Abandons;

impl Handler for Abandons {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, _request: &Request) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let response = Response::ok("never sent");
        writer.write_status_line(StatusCode::Ok).await?;
        writer.write_headers(&response.headers).await?;
        Ok(())
    }
}

/// Calls `write_body` before anything else.
pub struct OutOfOrder;

impl Handler for OutOfOrder {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, _request: &Request) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        writer.write_body(b"oops").await?;
        Ok(())
    }
}
