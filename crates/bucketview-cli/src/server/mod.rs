//! HTTP/HTTPS server startup with graceful shutdown.
//!
//! The protocol is chosen from the configuration: HTTPS when the `tls`
//! feature is enabled and a certificate pair is configured, HTTP otherwise.

mod error;
mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;
mod shutdown;

use axum::Router;
pub use error::{ServerError, ServerResult};
use http_server::serve_http;
#[cfg(feature = "tls")]
use https_server::serve_https;
use shutdown::shutdown_signal;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Serves `app` until a shutdown signal is received.
///
/// `listings` is the token in-flight listings observe; it is cancelled once
/// the shutdown grace period runs out.
pub async fn serve(
    app: Router,
    config: ServerConfig,
    listings: CancellationToken,
) -> ServerResult<()> {
    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) =
        (config.tls_cert_path.clone(), config.tls_key_path.clone())
    {
        return serve_https(app, config, listings, cert_path, key_path).await;
    }

    serve_http(app, config, listings).await
}
