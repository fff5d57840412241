//! Error type for listing operations.

use std::fmt;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Broad classification of a listing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or missing configuration, fatal at startup.
    Config,
    /// The prefix does not satisfy the prefix invariant.
    InvalidPrefix,
    /// The remote listing call failed or returned an inconsistent page.
    Upstream,
    /// The listing was abandoned before it completed.
    Cancelled,
}

impl ErrorKind {
    /// Stable label used as the message prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::InvalidPrefix => "prefix",
            Self::Upstream => "upstream",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A lightweight error carrying a kind, a message, an optional source, and a
/// retryable flag.
pub struct Error {
    kind: ErrorKind,
    message: String,
    prefix: Option<String>,
    source: Option<BoxedError>,
    retryable: bool,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl fmt::Display) -> Self {
        Self {
            kind,
            message: format!("[{}] {msg}", kind.as_str()),
            prefix: None,
            source: None,
            retryable: false,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Config, msg)
    }

    /// Create an invalid-prefix error.
    pub fn invalid_prefix(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::InvalidPrefix, msg)
    }

    /// Create an upstream listing error for `prefix`.
    pub fn upstream(msg: impl fmt::Display, prefix: &str, retryable: bool) -> Self {
        Self {
            prefix: Some(prefix.to_owned()),
            retryable,
            ..Self::new(ErrorKind::Upstream, msg)
        }
    }

    /// Create a cancellation error for `prefix`.
    pub fn cancelled(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_owned()),
            ..Self::new(ErrorKind::Cancelled, format!("listing of '{prefix}' was cancelled"))
        }
    }

    /// Attach a source error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The prefix being listed when the error occurred, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Human-readable message, including the kind label.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the caller may retry this operation.
    ///
    /// Listing never retries internally; this is only a hint.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Whether the listing was abandoned through cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("prefix", &self.prefix)
            .field("retryable", &self.retryable)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Specialized [`Result`] type for listing operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn upstream_error_carries_prefix_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out");
        let error = Error::upstream("list call failed", "photos/", true).with_source(io);

        assert_eq!(error.kind(), ErrorKind::Upstream);
        assert_eq!(error.prefix(), Some("photos/"));
        assert!(error.is_retryable());
        assert!(error.source().is_some());
        assert_eq!(error.to_string(), "[upstream] list call failed");
    }

    #[test]
    fn cancelled_is_distinct_from_upstream() {
        let error = Error::cancelled("a/");
        assert!(error.is_cancelled());
        assert!(!error.is_retryable());
        assert_ne!(error.kind(), ErrorKind::Upstream);
    }
}
