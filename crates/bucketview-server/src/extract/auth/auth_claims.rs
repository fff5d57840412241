//! Claims carried by a session token.

use jiff::Timestamp;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

/// Session token claims.
///
/// | Claim | Field        | Description                 |
/// |-------|--------------|-----------------------------|
/// | `sub` | `user_id`    | Signed-in user identifier   |
/// | `sid` | `session_id` | Session identifier          |
/// | `iat` | `issued_at`  | Issue time (seconds)        |
/// | `exp` | `expires_at` | Expiration time (seconds)   |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "sub")]
    pub user_id: String,
    #[serde(rename = "sid", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl AuthClaims {
    /// Expiration as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<Timestamp> {
        Timestamp::from_second(self.expires_at).ok()
    }

    /// Whether the token has expired at the current time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }

    /// Decodes and validates a raw JWT.
    pub(crate) fn from_token(
        token: &str,
        decoding_key: &DecodingKey,
        validation: &Validation,
    ) -> Result<Self> {
        let claims = decode::<Self>(token, decoding_key, validation)?.claims;

        if claims.user_id.is_empty() {
            return Err(ErrorKind::MalformedAuthToken
                .with_message("Session token has no subject")
                .with_resource("authentication"));
        }

        // jsonwebtoken allows clock leeway; sessions end at `exp` exactly.
        if claims.is_expired() {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %claims.user_id,
                expires_at = claims.expires_at,
                "session token expired"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            user_id = %claims.user_id,
            session_id = claims.session_id.as_deref().unwrap_or_default(),
            "session token validated"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            error = %error,
            "session token rejected"
        );

        match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Session token verification failed")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Session token is from an untrusted source"),
            JwtErrorKind::ImmatureSignature => ErrorKind::Unauthorized
                .with_message("Session token is not yet valid"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Session token uses an unsupported algorithm"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Session token is incomplete")
                .with_context(format!("Token is missing required claim: {claim}")),
            JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) | JwtErrorKind::Json(_) => {
                ErrorKind::MalformedAuthToken.with_message("Session token is invalid")
            }
            _ => ErrorKind::InternalServerError
                .with_message("Session processing failed")
                .with_context("An unexpected error occurred during token validation"),
        }
    }
}
