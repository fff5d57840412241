use jiff::Timestamp;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatusResponse {
    pub is_healthy: bool,
    pub updated_at: Timestamp,
    pub version: &'static str,
}
