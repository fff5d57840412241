//! Utility modules for common functionality across the crate.

pub mod tracing_targets;

/// Default maximum request body size. The API only serves reads.
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;
