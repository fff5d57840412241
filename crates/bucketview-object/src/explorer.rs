//! Listing service composing the gateway and the projector.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::client::ListingGateway;
use crate::config::ExplorerConfig;
use crate::projector::{Projector, QueryResult};
use crate::providers::{Client, S3Provider};
use crate::types::{Error, Prefix, Result};

const TRACING_TARGET: &str = "bucketview_object::explorer";

/// Answers "what is stored at this prefix" queries.
///
/// Cloning is cheap; clones share the remote client and the projector.
#[derive(Debug, Clone)]
pub struct ListingService {
    bucket: Arc<str>,
    gateway: ListingGateway,
    projector: Arc<Projector>,
}

impl ListingService {
    pub fn new(bucket: &str, gateway: ListingGateway, projector: Projector) -> Self {
        Self {
            bucket: Arc::from(bucket),
            gateway,
            projector: Arc::new(projector),
        }
    }

    /// Validates `config` and connects to the configured S3 bucket.
    pub async fn connect(config: &ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let projector = config.projector()?;
        let provider = S3Provider::connect(&config.s3_credentials()).await?;

        tracing::info!(
            target: TRACING_TARGET,
            provider = S3Provider::ID,
            bucket = %config.bucket,
            exclude_pattern = config.exclude_pattern.as_deref().unwrap_or_default(),
            url_base = %config.url_base,
            "listing service connected"
        );

        Ok(Self::new(&config.bucket, ListingGateway::new(provider), projector))
    }

    /// Name of the bucket being browsed.
    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Lists and projects everything directly under `prefix`.
    pub async fn get_listing(&self, prefix: &Prefix) -> Result<QueryResult> {
        self.get_listing_until_cancelled(prefix, &CancellationToken::new())
            .await
    }

    /// Like [`get_listing`](Self::get_listing), abandoning the query once
    /// `cancel` fires.
    #[tracing::instrument(
        name = "listing.get",
        target = "bucketview_object::explorer",
        skip(self, cancel),
        fields(prefix = %prefix)
    )]
    pub async fn get_listing_until_cancelled(
        &self,
        prefix: &Prefix,
        cancel: &CancellationToken,
    ) -> Result<QueryResult> {
        let raw = self.gateway.list_until_cancelled(prefix, cancel).await?;
        let result = self.projector.project(prefix, raw);

        tracing::debug!(
            target: TRACING_TARGET,
            folders = result.folders.len(),
            objects = result.objects.len(),
            "listing projected"
        );

        Ok(result)
    }

    /// Runs the query for `prefix` in the background.
    ///
    /// Dropping the returned [`ListingTask`] cancels the query.
    pub fn spawn(&self, prefix: Prefix) -> ListingTask {
        let cancel = CancellationToken::new();
        let (sender, status) = watch::channel(QueryStatus::InFlight);

        let service = self.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            let outcome = service.get_listing_until_cancelled(&prefix, &token).await;
            sender.send_replace(QueryStatus::from(outcome));
        });

        ListingTask {
            status,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
        }
    }
}

/// Observable state of a listing query.
#[derive(Debug, Clone)]
pub enum QueryStatus {
    InFlight,
    Failed(Arc<Error>),
    Succeeded(QueryResult),
    Cancelled,
}

impl QueryStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::InFlight)
    }
}

impl From<Result<QueryResult>> for QueryStatus {
    fn from(value: Result<QueryResult>) -> Self {
        match value {
            Ok(result) => Self::Succeeded(result),
            Err(error) if error.is_cancelled() => Self::Cancelled,
            Err(error) => Self::Failed(Arc::new(error)),
        }
    }
}

/// Handle to a listing running in the background.
#[derive(Debug)]
pub struct ListingTask {
    status: watch::Receiver<QueryStatus>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl ListingTask {
    /// Current status without waiting.
    pub fn status(&self) -> QueryStatus {
        self.status.borrow().clone()
    }

    /// Requests cancellation; no further pages are fetched.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits until the query leaves [`QueryStatus::InFlight`].
    pub async fn finished(mut self) -> QueryStatus {
        match self.status.wait_for(QueryStatus::is_finished).await {
            Ok(status) => status.clone(),
            Err(_) => QueryStatus::Cancelled,
        }
    }
}
