//! Session token extraction.
//!
//! The token is read from the `Authorization: Bearer` header, falling back
//! to the [`SESSION_COOKIE`] cookie set by the sign-in frontend.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use super::AuthClaims;
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{ErrorKind, Result};
use crate::service::SessionKeys;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "__session";

/// Validated session token of the current request.
///
/// Only performs JWT validation; use [`AuthState`] in handlers.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
}

impl AuthHeader {
    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.auth_claims
    }

    /// Validates `token` with the configured session keys.
    pub fn from_token(token: &str, keys: &SessionKeys) -> Result<Self> {
        let auth_claims = AuthClaims::from_token(token, keys.decoding_key(), keys.validation())?;
        Ok(Self { auth_claims })
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = crate::handler::Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached header if available to avoid re-parsing
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let token = match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(bearer)) => bearer.token().to_owned(),
            Err(rejection) => match rejection.reason() {
                TypedHeaderRejectionReason::Missing => CookieJar::from_headers(&parts.headers)
                    .get(SESSION_COOKIE)
                    .map(|cookie| cookie.value().to_owned())
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| {
                        ErrorKind::MissingAuthToken
                            .with_context("Missing Bearer token or session cookie")
                            .with_resource("authentication")
                    })?,
                _ => {
                    tracing::debug!(
                        target: TRACING_TARGET_AUTHENTICATION,
                        error = %rejection,
                        "malformed authorization header"
                    );
                    return Err(ErrorKind::MalformedAuthToken
                        .with_context("Authorization header must contain a valid Bearer token")
                        .with_resource("authentication"));
                }
            },
        };

        let auth_header = Self::from_token(&token, &SessionKeys::from_ref(state))?;
        parts.extensions.insert(auth_header.clone());
        Ok(auth_header)
    }
}
