//! Folder and object listing handler.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use bucketview_object::ListingService;
use bucketview_object::types::Prefix;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_LISTING as TRACING_TARGET;
use crate::extract::{AuthState, Query};
use crate::handler::Result;
use crate::handler::response::ListingResponse;
use crate::service::ServiceState;

/// Query parameters of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
struct ListingRequest {
    /// Prefix to list; the bucket root when absent.
    #[serde(default)]
    prefix: Option<String>,
}

/// Lists the folders and objects directly under a prefix.
///
/// Dropping this future (e.g. the client disconnects) abandons the listing;
/// no further pages are requested from the object store. The same happens
/// when the shutdown grace period runs out, which answers 503.
#[tracing::instrument(skip_all, fields(user_id = %auth_state.user_id()))]
async fn get_listing(
    State(listing): State<ListingService>,
    State(shutdown): State<CancellationToken>,
    auth_state: AuthState,
    Query(request): Query<ListingRequest>,
) -> Result<Json<ListingResponse>> {
    let prefix = Prefix::sanitize(request.prefix.as_deref().unwrap_or_default())?;

    tracing::debug!(
        target: TRACING_TARGET,
        prefix = %prefix,
        "listing requested"
    );

    let result = listing
        .get_listing_until_cancelled(&prefix, &shutdown)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        prefix = %prefix,
        folders = result.folders.len(),
        objects = result.objects.len(),
        "listing served"
    );

    let response = ListingResponse::new(listing.bucket_name(), &prefix, result);
    Ok(Json(response))
}

/// Returns a [`Router`] with the listing routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/listing", get(get_listing))
}
