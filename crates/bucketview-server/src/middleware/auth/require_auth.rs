use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthState;

/// Requires a valid session to proceed with the request.
///
/// Requests without a verified session token are rejected with a 401 JSON
/// error before reaching the handler.
///
/// ```rust,ignore
/// use axum::middleware::from_fn_with_state;
/// use bucketview_server::middleware::require_authentication;
///
/// let guard = from_fn_with_state(state, require_authentication);
/// ```
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
