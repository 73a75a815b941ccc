use std::net::{Ipv4Addr, SocketAddr};

use tazza::{app, initialize_state, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::setup_subscriber();

    let state = initialize_state().await;

    let addr =
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, state.config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "tazza listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
