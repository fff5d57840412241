//! Server error types with recovery suggestions.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Runtime server error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),

    /// TLS configuration error.
    #[cfg_attr(not(feature = "tls"), allow(dead_code))]
    #[error("TLS certificate error: {0}")]
    TlsCertificate(String),
}

impl ServerError {
    pub fn invalid_config(err: &anyhow::Error) -> Self {
        Self::InvalidConfig(format!("{err:#}"))
    }

    pub fn bind_error(address: &str, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_owned(),
            source,
        }
    }

    /// Returns a unique error code for this error type.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::BindError { .. } => "E002",
            Self::Runtime(_) => "E003",
            Self::TlsCertificate(_) => "E004",
        }
    }

    /// Whether retrying, possibly after an environment change, can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::TlsCertificate(_) => false,
            Self::BindError { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::PermissionDenied
                    | io::ErrorKind::AddrInUse
                    | io::ErrorKind::AddrNotAvailable
            ),
            Self::Runtime(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::ConnectionRefused
            ),
        }
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => {
                Some("Check the command-line flags and environment variables")
            }
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Try using a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => Some(
                    "The port is already in use. Try a different port or stop the conflicting service",
                ),
                io::ErrorKind::AddrNotAvailable => {
                    Some("The address is not available. Check network interface configuration")
                }
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(err) => match err.kind() {
                io::ErrorKind::Interrupted => Some("The operation was interrupted, you may retry"),
                io::ErrorKind::TimedOut => {
                    Some("The operation timed out, consider increasing timeout values")
                }
                _ => None,
            },
            Self::TlsCertificate(_) => {
                Some("Verify certificate and key files exist and are in correct PEM format")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let codes = [
            ServerError::InvalidConfig("test".to_owned()).error_code(),
            ServerError::bind_error("127.0.0.1:80", io::Error::other("test")).error_code(),
            ServerError::Runtime(io::Error::other("test")).error_code(),
            ServerError::TlsCertificate("test".to_owned()).error_code(),
        ];

        for (i, code) in codes.iter().enumerate() {
            assert!(!codes[i + 1..].contains(code), "duplicate error code {code}");
        }
    }

    #[test]
    fn port_in_use_is_recoverable() {
        let err = ServerError::bind_error(
            "127.0.0.1:3000",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(err.is_recoverable());
        assert!(err.suggestion().is_some_and(|s| s.contains("already in use")));
    }

    #[test]
    fn invalid_config_is_not_recoverable() {
        let err = ServerError::invalid_config(&anyhow::anyhow!("port too low"));

        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Invalid configuration: port too low");
    }
}
