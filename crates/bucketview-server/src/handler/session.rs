//! Session introspection handler.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::TRACING_TARGET_AUTHENTICATION as TRACING_TARGET;
use crate::extract::AuthState;
use crate::handler::response::SessionResponse;
use crate::service::ServiceState;

/// Reports who is signed in.
///
/// Never fails: an absent or invalid session is reported as `401` with a
/// `null` id so the frontend can redirect to sign in.
async fn get_session(auth_state: Option<AuthState>) -> (StatusCode, Json<SessionResponse>) {
    match auth_state {
        Some(auth_state) => {
            tracing::debug!(
                target: TRACING_TARGET,
                user_id = %auth_state.user_id(),
                "session resolved"
            );
            let response = SessionResponse {
                id: Some(auth_state.user_id().to_owned()),
            };
            (StatusCode::OK, Json(response))
        }
        None => (StatusCode::UNAUTHORIZED, Json(SessionResponse { id: None })),
    }
}

/// Returns a [`Router`] with the session routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/session", get(get_session))
}
