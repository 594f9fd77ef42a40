//! Administrative HTTP server.

pub mod router;
pub mod types;

pub use router::create_router_with_state;
pub use types::{ServerState, MAX_REQUEST_BODY_SIZE};

use std::future::Future;
use std::net::SocketAddr;

/// Serve the API until `shutdown` completes.
pub async fn run<F>(state: ServerState, bind: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router_with_state(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %bind, "Admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}
