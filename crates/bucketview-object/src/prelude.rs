//! Convenience re-exports.

pub use crate::client::{ListPages, ListingGateway};
pub use crate::projector::{ExcludePattern, Folder, ObjectEntry, Projector, QueryResult, UrlBuilder};
pub use crate::providers::{Client, MemoryProvider, S3Credentials, S3Provider};
pub use crate::types::{Breadcrumb, Error, ErrorKind, Prefix, RawEntry, RawListing};
pub use crate::{ExplorerConfig, ListingService, ListingTask, QueryStatus};
