use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionOptions};
use crate::server::handler::Handler;
use crate::server::metrics::ConnectionCounter;

pub async fn run<H: Handler>(cfg: &Config, handler: H) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, cfg.connection_options(), handler, ConnectionCounter::new()).await
}

/// Accepts connections forever, serving each one on its own task.
pub async fn serve<H: Handler>(
    listener: TcpListener,
    options: ConnectionOptions,
    handler: H,
    counter: ConnectionCounter,
) -> anyhow::Result<()> {
    let handler = Arc::new(handler);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        let guard = counter.track();
        info!(peer = %peer, live = counter.live(), "Accepted connection");

        let handler = Arc::clone(&handler);
        let span = tracing::info_span!("conn", peer = %peer);
        tokio::spawn(
            async move {
                let _guard = guard;
                let mut conn = Connection::new(socket, options);
                if let Err(e) = conn.run(&*handler).await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(span),
        );
    }
}
