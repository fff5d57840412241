#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Paginating gateway over a remote listing API.
pub mod client;
mod config;
mod explorer;
/// Filtering, naming and URL derivation for raw listings.
pub mod projector;
/// Client trait and listing providers.
pub mod providers;
/// Prefix, raw listing and error types.
pub mod types;

pub use config::{ExplorerConfig, ExplorerConfigBuilder};
pub use explorer::{ListingService, ListingTask, QueryStatus};

#[doc(hidden)]
pub mod prelude;
