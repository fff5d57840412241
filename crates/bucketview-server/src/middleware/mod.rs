//! Middleware for `axum::Router` and HTTP request processing.
//!
//! ```rust,no_run
//! use axum::Router;
//! use bucketview_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod auth;
mod observability;
mod recovery;
mod security;

pub use auth::require_authentication;
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig};
