//! Plain HTTP server.

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{ServerError, ServerResult, shutdown_signal};

/// Binds the configured address and serves `app` over HTTP.
pub async fn serve_http(
    app: Router,
    server_config: ServerConfig,
    listings: CancellationToken,
) -> ServerResult<()> {
    server_config
        .validate()
        .map_err(|err| ServerError::invalid_config(&err))?;

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        ServerError::bind_error(&server_addr.to_string(), err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "HTTP server bound and ready"
    );

    let shutdown_signal = shutdown_signal(listings, server_config.shutdown_timeout());
    serve_with_shutdown(&server_config, || async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await
    })
    .await
    .map_err(ServerError::Runtime)
}
