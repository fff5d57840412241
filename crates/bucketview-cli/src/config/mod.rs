//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, TLS, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, request timeout
//! └── service: ServiceConfig        # Bucket, credentials, session keys
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use bucketview_server::service::ServiceConfig;
use clap::Parser;
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "bucketview")]
#[command(about = "Browse an S3-compatible bucket as a folder hierarchy")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Bucket, credentials, projection and session key configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads the `.env` file (if enabled) and parses CLI arguments.
    ///
    /// The `.env` file is loaded first so clap's `env` fallbacks see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with `RUST_LOG` filtering, defaulting to `info`.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .validate()
            .context("invalid explorer configuration")?;
        Ok(())
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        let explorer = &self.service.explorer;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bucket = %explorer.bucket,
            region = %explorer.region,
            endpoint = explorer.endpoint.as_deref().unwrap_or("default"),
            exclude_pattern = explorer.exclude_pattern.as_deref().unwrap_or_default(),
            url_base = %explorer.url_base,
            session_algorithm = ?self.service.session.algorithm,
            "Explorer configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "tls").then_some("tls"),
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
