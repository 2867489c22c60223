use std::future::Future;

use tokio::io::AsyncWrite;

use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Business logic invoked once per connection.
///
/// The request is fully parsed before `handle` is called. An
/// implementation is expected to drive `writer` to
/// [`WriterState::Done`](crate::http::writer::WriterState::Done); the
/// connection is closed when the returned future completes either way.
///
/// # Example
///
/// ```ignore
/// struct Hello;
///
/// impl Handler for Hello {
///     async fn handle<W>(&self, writer: &mut ResponseWriter<W>, _req: &Request) -> anyhow::Result<()>
///     where
///         W: AsyncWrite + Unpin + Send,
///     {
///         Response::ok("hello\n").write_to(writer).await?;
///         Ok(())
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> impl Future<Output = anyhow::Result<()>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}
