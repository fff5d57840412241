use bucketview_object::ListingService;
use tokio_util::sync::CancellationToken;

use crate::service::{Result, ServiceConfig, SessionKeys};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub listing: ListingService,
    pub session_keys: SessionKeys,
    /// Cancelled once the process stops waiting for in-flight listings.
    pub shutdown: CancellationToken,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the object store and loads the session keys.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let service_state = Self {
            listing: config.connect_listing().await?,
            session_keys: config.load_session_keys().await?,
            shutdown: CancellationToken::new(),
        };

        Ok(service_state)
    }

    /// Assembles state from already constructed services.
    pub fn new(listing: ListingService, session_keys: SessionKeys) -> Self {
        Self {
            listing,
            session_keys,
            shutdown: CancellationToken::new(),
        }
    }

    /// Replaces the token that in-flight listings observe.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(listing: ListingService);
impl_di!(session_keys: SessionKeys);
impl_di!(shutdown: CancellationToken);
