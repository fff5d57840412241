//! HTTPS server using rustls.

use std::io;
use std::path::{Path, PathBuf};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{ServerError, ServerResult, shutdown_signal};

/// Loads the certificate pair and serves `app` over HTTPS.
pub async fn serve_https(
    app: Router,
    server_config: ServerConfig,
    listings: CancellationToken,
    cert_path: PathBuf,
    key_path: PathBuf,
) -> ServerResult<()> {
    server_config
        .validate()
        .map_err(|err| ServerError::invalid_config(&err))?;
    validate_tls_files(&cert_path, &key_path)?;

    let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path)
        .await
        .map_err(|err| {
            ServerError::TlsCertificate(format!("Failed to load TLS certificates: {err}"))
        })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "TLS certificates loaded"
    );

    let server_addr = server_config.server_addr();
    let shutdown_timeout = server_config.shutdown_timeout();

    serve_with_shutdown(&server_config, move || async move {
        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            shutdown_signal(listings, shutdown_timeout).await;
            shutdown_handle.graceful_shutdown(Some(shutdown_timeout));
        });

        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            "HTTPS server bound and ready"
        );

        axum_server::bind_rustls(server_addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
    })
    .await
    .map_err(|err: io::Error| ServerError::Runtime(err))
}

fn validate_tls_files(cert_path: &Path, key_path: &Path) -> ServerResult<()> {
    let validate_file = |path: &Path, file_type: &str| -> ServerResult<()> {
        let metadata = std::fs::metadata(path).map_err(|err| {
            ServerError::TlsCertificate(format!(
                "Cannot read {file_type} file {}: {err}",
                path.display()
            ))
        })?;

        if !metadata.is_file() {
            return Err(ServerError::TlsCertificate(format!(
                "{file_type} path is not a file: {}",
                path.display()
            )));
        }

        if metadata.len() == 0 {
            return Err(ServerError::TlsCertificate(format!(
                "{file_type} file is empty: {}",
                path.display()
            )));
        }

        Ok(())
    };

    validate_file(cert_path, "certificate")?;
    validate_file(key_path, "private key")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_files() {
        let result = validate_tls_files(Path::new("missing_cert.pem"), Path::new("missing_key.pem"));
        assert!(matches!(result, Err(ServerError::TlsCertificate(msg)) if msg.contains("certificate")));
    }

    #[test]
    fn rejects_empty_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, "")?;
        std::fs::write(&key, "key")?;

        let result = validate_tls_files(&cert, &key);
        assert!(matches!(result, Err(ServerError::TlsCertificate(msg)) if msg.contains("empty")));
        Ok(())
    }
}
