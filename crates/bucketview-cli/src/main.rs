#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use bucketview_server::handler::{CustomRoutes, routes};
use bucketview_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityHeadersConfig,
};
use bucketview_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "bucketview_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "bucketview_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "bucketview_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    if let Some(server_error) = error.downcast_ref::<ServerError>() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error_code = server_error.error_code(),
            recoverable = server_error.is_recoverable(),
            suggestion = server_error.suggestion().unwrap_or_default(),
            "Recovery suggestion"
        );
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service).await?;
    let listings = state.shutdown.clone();
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server, listings).await?;

    Ok(())
}

/// Connects to the bucket and loads the session keys.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost): catches panics and enforces timeouts
/// 2. Observability: request ids, tracing spans and timing
/// 3. Security: CORS, security headers, compression
/// 4. Routes (innermost)
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(CustomRoutes::new(), state.clone())
        .with_state(state)
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_metrics()
        .with_observability()
        .with_recovery(&middleware.recovery)
}
