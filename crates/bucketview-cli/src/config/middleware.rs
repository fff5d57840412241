//! Middleware configuration for the HTTP server.

use anyhow::{Result as AnyhowResult, anyhow};
use bucketview_server::middleware::{CorsConfig, RecoveryConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Upper bound for the request timeout, in seconds.
const MAX_REQUEST_TIMEOUT: u64 = 300;

/// Middleware configuration combining CORS and recovery settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    pub fn validate(&self) -> AnyhowResult<()> {
        let timeout = self.recovery.request_timeout;
        if timeout == 0 || timeout > MAX_REQUEST_TIMEOUT {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and {MAX_REQUEST_TIMEOUT} seconds."
            ));
        }

        Ok(())
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_timeouts() {
        let mut config = MiddlewareConfig {
            cors: CorsConfig::default(),
            recovery: RecoveryConfig::default(),
        };
        assert!(config.validate().is_ok());

        config.recovery.request_timeout = 0;
        assert!(config.validate().is_err());

        config.recovery.request_timeout = 301;
        assert!(config.validate().is_err());
    }
}
