//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,ignore
//! use bucketview_server::handler::{CustomRoutes, routes};
//! use bucketview_server::service::{ServiceConfig, ServiceState};
//!
//! let state = ServiceState::from_config(&config).await?;
//! let router = routes(CustomRoutes::new(), state.clone()).with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod listing;
mod monitors;
mod response;
mod session;
mod utils;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{
    BreadcrumbResponse, ErrorResponse, ListingResponse, MonitorStatusResponse, SessionResponse,
};
pub use crate::handler::utils::{CustomRoutes, RouterMapFn};
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all private routes.
fn private_routes(additional_routes: Option<Router<ServiceState>>) -> Router<ServiceState> {
    let mut router = Router::new().merge(listing::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns a [`Router`] with all public routes.
fn public_routes(additional_routes: Option<Router<ServiceState>>) -> Router<ServiceState> {
    let mut router = Router::new()
        .merge(session::routes())
        .merge(monitors::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns a [`Router`] with all routes.
pub fn routes(mut routes: CustomRoutes, state: ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    let private_router = private_routes(routes.private_routes.take());
    let private_router = routes
        .map_private_before_middleware(private_router)
        .route_layer(require_authentication);

    let public_router = public_routes(routes.public_routes.take());

    Router::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use axum::Router;
    use axum_test::TestServer;
    use bucketview_object::prelude::{
        ExcludePattern, ListingGateway, ListingService, MemoryProvider, Projector, UrlBuilder,
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use crate::handler::{CustomRoutes, routes};
    use crate::service::{ServiceState, SessionKeys};

    pub const TEST_BUCKET: &str = "test-bucket";
    pub const TEST_SECRET: &[u8] = b"test-session-secret";
    pub const TEST_URL_BASE: &str = "https://files.example.com";

    /// Signs a session token for `user_id` valid for five minutes.
    pub fn session_token(user_id: &str) -> String {
        let exp = jiff::Timestamp::now().as_second() + 300;
        let claims = json!({ "sub": user_id, "sid": "session-1", "exp": exp });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .expect("token should encode")
    }

    /// Returns state backed by `provider` with an optional exclusion pattern.
    pub fn create_test_state(provider: MemoryProvider, exclude: Option<&str>) -> ServiceState {
        let projector = Projector::new(
            ExcludePattern::new(exclude).expect("pattern should compile"),
            UrlBuilder::new(TEST_URL_BASE).expect("url base should parse"),
        );
        let listing = ListingService::new(TEST_BUCKET, ListingGateway::new(provider), projector);
        ServiceState::new(listing, SessionKeys::from_secret(TEST_SECRET))
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_state(
        router: Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router.with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router over `provider`.
    pub fn create_test_server_with_provider(
        provider: MemoryProvider,
    ) -> anyhow::Result<TestServer> {
        let state = create_test_state(provider, None);
        let router = routes(CustomRoutes::new(), state.clone());
        create_test_server_with_state(router, state)
    }

    /// Returns a new [`TestServer`] with the default router and an empty bucket.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_provider(MemoryProvider::new())
    }

    #[tokio::test]
    async fn unknown_route_returns_json_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/does-not-exist").await;
        response.assert_status_not_found();
        assert_eq!(response.json::<serde_json::Value>()["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn custom_private_routes_require_a_session() -> anyhow::Result<()> {
        use axum::routing::get;

        let state = create_test_state(MemoryProvider::new(), None);
        let custom = CustomRoutes::new()
            .with_private_routes(Router::new().route("/api/private", get(|| async { "secret" })));
        let server = create_test_server_with_state(routes(custom, state.clone()), state)?;

        server.get("/api/private").await.assert_status_unauthorized();

        let response = server
            .get("/api/private")
            .authorization_bearer(session_token("user-1"))
            .await;
        response.assert_status_ok();
        response.assert_text("secret");
        Ok(())
    }
}
