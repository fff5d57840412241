//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters.

/// Session token extraction and JWT validation.
pub const TRACING_TARGET_AUTHENTICATION: &str = "bucketview_server::authentication";

/// Listing queries served over HTTP.
pub const TRACING_TARGET_LISTING: &str = "bucketview_server::listing";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "bucketview_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "bucketview_server::recovery::panic";

/// Session key loading.
pub const TRACING_TARGET_SESSION_KEYS: &str = "bucketview_server::session_keys";

/// Per-request timing and size records.
pub const TRACING_TARGET_METRICS: &str = "bucketview_server::metrics";
