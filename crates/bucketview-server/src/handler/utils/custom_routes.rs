//! Custom routes for extending the API router.

use axum::Router;

use crate::service::ServiceState;

/// Function that transforms a router before or after middleware is applied.
pub type RouterMapFn = fn(Router<ServiceState>) -> Router<ServiceState>;

/// Extra routes merged into the API router.
///
/// Private routes sit behind the session check, public routes do not.
///
/// ```rust
/// use axum::Router;
/// use axum::routing::get;
/// use bucketview_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new()
///     .with_public_routes(Router::new().route("/ping", get(|| async { "pong" })));
/// assert!(custom.has_public_routes());
/// ```
#[derive(Default, Clone)]
pub struct CustomRoutes {
    pub private_routes: Option<Router<ServiceState>>,
    pub public_routes: Option<Router<ServiceState>>,
    /// Applied to all private routes before the session check is layered.
    pub private_before_middleware: Option<RouterMapFn>,
}

impl CustomRoutes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_private_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.private_routes = Some(routes);
        self
    }

    pub fn with_public_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.public_routes = Some(routes);
        self
    }

    /// Adds private routes, merging with existing ones if any.
    pub fn add_private_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.private_routes = Some(match self.private_routes {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Adds public routes, merging with existing ones if any.
    pub fn add_public_routes(mut self, routes: Router<ServiceState>) -> Self {
        self.public_routes = Some(match self.public_routes {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    pub fn with_private_before_middleware(mut self, f: RouterMapFn) -> Self {
        self.private_before_middleware = Some(f);
        self
    }

    pub fn has_private_routes(&self) -> bool {
        self.private_routes.is_some()
    }

    pub fn has_public_routes(&self) -> bool {
        self.public_routes.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_private_routes() && !self.has_public_routes()
    }

    pub(crate) fn map_private_before_middleware(
        &self,
        routes: Router<ServiceState>,
    ) -> Router<ServiceState> {
        match self.private_before_middleware {
            Some(f) => f(routes),
            None => routes,
        }
    }
}
