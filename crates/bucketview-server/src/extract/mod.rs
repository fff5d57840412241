//! Request extractors with improved error handling.
//!
//! - [`AuthHeader`] - session token extraction and JWT validation
//! - [`AuthClaims`] - claims carried by a session token
//! - [`AuthState`] - verified session of the current request
//! - [`Query`] - query parameter extraction with enhanced error messages

mod auth;
mod reject;

pub use auth::{AuthClaims, AuthHeader, AuthState, SESSION_COOKIE};
pub use reject::Query;
