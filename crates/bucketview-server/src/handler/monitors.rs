//! Liveness probe.

use axum::routing::get;
use axum::{Json, Router};
use jiff::Timestamp;

use crate::handler::response::MonitorStatusResponse;
use crate::service::ServiceState;

/// Reports that the server is up.
///
/// Does not touch the object store, so a slow or failing bucket never takes
/// the probe down with it.
async fn health_status() -> Json<MonitorStatusResponse> {
    Json(MonitorStatusResponse {
        is_healthy: true,
        updated_at: Timestamp::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn health_is_public() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["isHealthy"], true);
        assert!(body["updatedAt"].is_string());
        Ok(())
    }
}
