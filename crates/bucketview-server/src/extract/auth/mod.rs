//! Session authentication extractors.

mod auth_claims;
mod auth_header;
mod auth_state;

pub use auth_claims::AuthClaims;
pub use auth_header::{AuthHeader, SESSION_COOKIE};
pub use auth_state::AuthState;
