use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::http::connection::{Connection, ConnectionSettings};
use crate::routing::router::Router;

/// Accept loop: one task per connection, no cap on how many run at once.
pub async fn run(
    listener: TcpListener,
    router: Arc<Router>,
    settings: ConnectionSettings,
) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (socket, peer) = listener.accept().await?;
        tracing::debug!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router, settings);
            if let Err(e) = conn.run().await {
                tracing::warn!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
