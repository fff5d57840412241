//! Paginating gateway over a remote listing API.
//!
//! [`ListingGateway`] is a thin, cloneable wrapper around `Arc<dyn ListPages>`
//! that follows continuation tokens until the remote reports the final page.
//! Callers only ever observe a fully materialized [`RawListing`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::types::{DELIMITER, Error, ListPage, PageRequest, Prefix, RawListing, Result};

const TRACING_TARGET: &str = "bucketview_object::client";

/// A remote that can serve one page of a delimiter-grouped listing.
#[async_trait::async_trait]
pub trait ListPages: Send + Sync + 'static {
    /// Fetches the page described by `request`.
    ///
    /// Transport and remote failures must be reported as upstream errors.
    async fn list_page(&self, request: PageRequest) -> Result<ListPage>;
}

/// Cloneable handle to any [`ListPages`] backend (S3, in-memory, ...).
///
/// The gateway holds no per-query state, so a single instance may list
/// different prefixes concurrently. Failed calls are never retried.
#[derive(Clone)]
pub struct ListingGateway(Arc<dyn ListPages>);

impl ListingGateway {
    /// Wrap a concrete [`ListPages`] implementation.
    pub fn new(source: impl ListPages) -> Self {
        Self(Arc::new(source))
    }

    /// Wrap an already shared [`ListPages`] implementation.
    pub fn from_arc(source: Arc<dyn ListPages>) -> Self {
        Self(source)
    }

    /// Lists every common prefix and entry directly under `prefix`.
    pub async fn list(&self, prefix: &Prefix) -> Result<RawListing> {
        self.list_until_cancelled(prefix, &CancellationToken::new())
            .await
    }

    /// Lists `prefix`, abandoning the operation once `cancel` fires.
    ///
    /// Cancellation is observed before each page request and while a page is
    /// in flight. A cancelled listing issues no further requests and its
    /// partial accumulation is discarded.
    #[tracing::instrument(
        name = "object.list",
        target = "bucketview_object::client",
        skip(self, cancel),
        fields(prefix = %prefix, pages = tracing::field::Empty),
    )]
    pub async fn list_until_cancelled(
        &self,
        prefix: &Prefix,
        cancel: &CancellationToken,
    ) -> Result<RawListing> {
        let mut listing = RawListing::default();
        let mut continuation_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0_usize;

        loop {
            if cancel.is_cancelled() {
                tracing::debug!(target: TRACING_TARGET, pages, "listing cancelled between pages");
                return Err(Error::cancelled(prefix.as_str()));
            }

            let request = PageRequest {
                prefix: prefix.clone(),
                delimiter: DELIMITER,
                continuation_token: continuation_token.clone(),
            };

            let page = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(target: TRACING_TARGET, pages, "listing cancelled mid-page");
                    return Err(Error::cancelled(prefix.as_str()));
                }
                page = self.0.list_page(request) => page?,
            };

            pages += 1;
            let is_truncated = page.is_truncated;
            let next_token = page.next_token.clone();

            tracing::trace!(
                target: TRACING_TARGET,
                page = pages,
                common_prefixes = page.common_prefixes.len(),
                entries = page.entries.len(),
                is_truncated,
                "received listing page"
            );

            listing.extend(page);

            if !is_truncated {
                break;
            }

            let Some(next) = next_token else {
                return Err(Error::upstream(
                    "page is truncated but carries no continuation token",
                    prefix.as_str(),
                    false,
                ));
            };

            // A token seen earlier in this listing would replay pages forever.
            if !seen_tokens.insert(next.clone()) {
                return Err(Error::upstream(
                    format!("continuation token '{next}' was repeated"),
                    prefix.as_str(),
                    false,
                ));
            }

            continuation_token = Some(next);
        }

        tracing::Span::current().record("pages", pages);
        tracing::debug!(
            target: TRACING_TARGET,
            pages,
            common_prefixes = listing.common_prefixes.len(),
            entries = listing.entries.len(),
            "listing complete"
        );

        Ok(listing)
    }
}

impl fmt::Debug for ListingGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListingGateway").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;
    use crate::providers::MemoryProvider;
    use crate::types::{ErrorKind, RawEntry};

    struct ScriptedPages(Vec<ListPage>);

    #[async_trait::async_trait]
    impl ListPages for ScriptedPages {
        async fn list_page(&self, request: PageRequest) -> Result<ListPage> {
            let index = match request.continuation_token.as_deref() {
                None => 0,
                Some(token) => token.parse::<usize>().unwrap(),
            };
            Ok(self.0[index].clone())
        }
    }

    /// Serves a page only after `release` is notified.
    #[derive(Default)]
    struct StalledPages {
        started: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ListPages for Arc<StalledPages> {
        async fn list_page(&self, _request: PageRequest) -> Result<ListPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(ListPage::default())
        }
    }

    fn page(entries: &[&str], next: Option<&str>) -> ListPage {
        ListPage {
            common_prefixes: Vec::new(),
            entries: entries.iter().map(|key| RawEntry::new(*key)).collect(),
            is_truncated: next.is_some(),
            next_token: next.map(str::to_owned),
        }
    }

    fn keys(listing: &RawListing) -> Vec<&str> {
        listing
            .entries
            .iter()
            .filter_map(|entry| entry.key.as_deref())
            .collect()
    }

    #[tokio::test]
    async fn merges_pages_in_order() {
        let provider = MemoryProvider::new()
            .with_page_size(2)
            .with_objects(["a/1", "a/2", "a/3", "a/4", "a/5"]);
        let calls = provider.calls();
        let gateway = ListingGateway::new(provider);

        let listing = gateway.list(&Prefix::new("a/").unwrap()).await.unwrap();

        assert_eq!(keys(&listing), ["a/1", "a/2", "a/3", "a/4", "a/5"]);
        assert_eq!(calls.count(), 3);
    }

    #[tokio::test]
    async fn single_page_issues_one_call() {
        let provider = MemoryProvider::new().with_objects(["x.txt"]);
        let calls = provider.calls();
        let gateway = ListingGateway::new(provider);

        gateway.list(&Prefix::root()).await.unwrap();
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn truncated_page_without_token_is_upstream_error() {
        let mut broken = page(&["a"], None);
        broken.is_truncated = true;
        let gateway = ListingGateway::new(ScriptedPages(vec![broken]));

        let error = gateway.list(&Prefix::root()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Upstream);
        assert_eq!(error.prefix(), Some(""));
    }

    #[tokio::test]
    async fn repeated_token_is_upstream_error() {
        let gateway = ListingGateway::new(ScriptedPages(vec![
            page(&["a"], Some("1")),
            page(&["b"], Some("1")),
        ]));

        let error = gateway.list(&Prefix::root()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn token_cycle_is_upstream_error() {
        let gateway = ListingGateway::new(ScriptedPages(vec![
            page(&["a"], Some("1")),
            page(&["b"], Some("2")),
            page(&["c"], Some("1")),
        ]));

        let error = gateway.list(&Prefix::root()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Upstream);
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn cancellation_while_page_in_flight() {
        let remote = Arc::new(StalledPages::default());
        let gateway = ListingGateway::new(remote.clone());
        let cancel = CancellationToken::new();

        let listing = tokio::spawn({
            let cancel = cancel.clone();
            async move { gateway.list_until_cancelled(&Prefix::root(), &cancel).await }
        });

        remote.started.notified().await;
        cancel.cancel();

        let error = listing.await.unwrap().unwrap_err();
        assert!(error.is_cancelled());
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn remote_failure_is_not_retried() {
        let provider = MemoryProvider::new()
            .with_page_size(1)
            .with_objects(["1", "2", "3"])
            .with_failure_on_call(2);
        let calls = provider.calls();
        let gateway = ListingGateway::new(provider);

        let error = gateway.list(&Prefix::root()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Upstream);
        assert_eq!(calls.count(), 2);
    }

    #[tokio::test]
    async fn cancellation_after_first_page_stops_requests() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let provider = MemoryProvider::new()
            .with_page_size(1)
            .with_objects(["p/1", "p/2", "p/3"])
            .on_page_served(move |served| {
                if served == 1 {
                    trigger.cancel();
                }
            });
        let calls = provider.calls();
        let gateway = ListingGateway::new(provider);

        let error = gateway
            .list_until_cancelled(&Prefix::new("p/").unwrap(), &cancel)
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn already_cancelled_issues_no_request() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let provider = MemoryProvider::new().with_objects(["a"]);
        let calls = provider.calls();
        let gateway = ListingGateway::new(provider);

        let error = gateway
            .list_until_cancelled(&Prefix::root(), &cancel)
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn repeated_listing_is_idempotent() {
        let gateway = ListingGateway::new(
            MemoryProvider::new()
                .with_page_size(2)
                .with_objects(["d/a", "d/b/c", "d/e"]),
        );
        let prefix = Prefix::new("d/").unwrap();

        let first = gateway.list(&prefix).await.unwrap();
        let second = gateway.list(&prefix).await.unwrap();
        assert_eq!(first, second);
    }
}
