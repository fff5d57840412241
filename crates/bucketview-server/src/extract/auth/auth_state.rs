//! Authenticated session extractor.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;

use super::{AuthClaims, AuthHeader};
use crate::handler::Error;
use crate::service::SessionKeys;

/// Verified session of the current request.
///
/// Extraction fails with a 401 response when the session token is missing,
/// malformed, expired or signed by an unknown key. As an optional extractor
/// (`Option<AuthState>`) any of these yields `None` instead.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    /// Identifier of the signed-in user.
    #[inline]
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let auth_state = Self(auth_header.into_auth_claims());
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let auth_state = <Self as FromRequestParts<S>>::from_request_parts(parts, state).await;
        Ok(auth_state.ok())
    }
}
