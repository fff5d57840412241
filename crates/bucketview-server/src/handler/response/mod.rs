//! Response types for HTTP handlers.

mod error_response;
mod listing;
mod monitor;
mod session;

pub use error_response::ErrorResponse;
pub use listing::{BreadcrumbResponse, ListingResponse};
pub use monitor::MonitorStatusResponse;
pub use session::SessionResponse;
