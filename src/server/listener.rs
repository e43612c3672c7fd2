use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::resolve::Resolver;

pub async fn run(cfg: &Config, resolver: Arc<Resolver>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr()).await?;
    info!("Listening on {}", cfg.listen_addr());

    serve(listener, resolver, cfg.max_request_size).await
}

/// Accepts connections forever, one task per client.
pub async fn serve(
    listener: TcpListener,
    resolver: Arc<Resolver>,
    max_request_size: usize,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, resolver, max_request_size);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            tracing::debug!("Ending connection with {}", peer);
        });
    }
}
