//! Client trait for creating authenticated remote connections.

use serde::de::DeserializeOwned;

use crate::types::Error;

/// Factory for authenticated connections to a listing backend.
///
/// Implementations handle credential validation and client construction for
/// a specific provider (e.g. S3).
#[async_trait::async_trait]
pub trait Client: Sized + Send + Sync + 'static {
    /// Strongly-typed credentials for this provider.
    type Credentials: DeserializeOwned + Send + Sync;

    /// Unique identifier (e.g. "s3").
    const ID: &str;

    /// Create a connected client instance.
    async fn connect(creds: &Self::Credentials) -> Result<Self, Error>;
}
