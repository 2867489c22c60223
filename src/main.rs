use rawhttp::config::Config;
use rawhttp::http::request::Request;
use rawhttp::http::response::Response;
use rawhttp::http::writer::ResponseWriter;
use rawhttp::server::{self, Handler};
use tokio::io::AsyncWrite;

struct Greeting;

impl Handler for Greeting {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, _request: &Request) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        Response::ok("Hello from rawhttp\n").write_to(writer).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    tokio::select! {
        res = server::listener::run(&cfg, Greeting) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
