//! In-process bucket for tests and local development.
//!
//! Keys are kept sorted, grouped by the request delimiter and paginated the
//! same way S3 does: folders and objects share one lexicographic sequence and
//! count equally toward the page size.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::client::ListPages;
use crate::types::{Error, ListPage, PageRequest, RawEntry, Result};

const DEFAULT_PAGE_SIZE: usize = 1000;

type PageHook = Arc<dyn Fn(usize) + Send + Sync>;

/// Shared counter of list calls received by a [`MemoryProvider`].
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Number of list calls received so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// In-memory [`ListPages`] implementation.
#[derive(Clone)]
pub struct MemoryProvider {
    objects: BTreeMap<String, RawEntry>,
    page_size: usize,
    calls: CallCounter,
    fail_on_call: Option<usize>,
    on_page_served: Option<PageHook>,
}

enum Item<'a> {
    Folder(String),
    Object(&'a RawEntry),
}

impl MemoryProvider {
    /// Empty bucket with the S3 default page size.
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            calls: CallCounter::default(),
            fail_on_call: None,
            on_page_served: None,
        }
    }

    /// Maximum number of folders plus objects per page (at least one).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds objects without metadata.
    pub fn with_objects<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            let key = key.into();
            self.objects.insert(key.clone(), RawEntry::new(key));
        }
        self
    }

    /// Adds one object with its metadata. Entries without a key are ignored.
    pub fn with_entry(mut self, entry: RawEntry) -> Self {
        if let Some(key) = entry.key.clone() {
            self.objects.insert(key, entry);
        }
        self
    }

    /// Fails the `call`-th list request (1-based) with a retryable upstream
    /// error.
    pub fn with_failure_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Runs `hook` with the number of pages served after each page.
    pub fn on_page_served(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_page_served = Some(Arc::new(hook));
        self
    }

    /// Handle observing the number of list calls.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    fn items<'a>(&'a self, prefix: &str, delimiter: char) -> Vec<Item<'a>> {
        let mut items = Vec::new();
        let mut last_folder: Option<String> = None;

        for (key, entry) in self.objects.range(prefix.to_owned()..) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break;
            };

            match rest.find(delimiter) {
                Some(index) => {
                    let folder = format!("{prefix}{}", &rest[..=index]);
                    if last_folder.as_deref() != Some(folder.as_str()) {
                        last_folder = Some(folder.clone());
                        items.push(Item::Folder(folder));
                    }
                }
                None => items.push(Item::Object(entry)),
            }
        }

        items
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("objects", &self.objects.len())
            .field("page_size", &self.page_size)
            .field("calls", &self.calls.count())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ListPages for MemoryProvider {
    async fn list_page(&self, request: PageRequest) -> Result<ListPage> {
        let call = self.calls.increment();
        let prefix = request.prefix.as_str();

        if self.fail_on_call == Some(call) {
            return Err(Error::upstream(
                format!("simulated failure on call {call}"),
                prefix,
                true,
            ));
        }

        let offset = match request.continuation_token.as_deref() {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|e| {
                Error::upstream(format!("invalid continuation token '{token}'"), prefix, false)
                    .with_source(e)
            })?,
        };

        let items = self.items(prefix, request.delimiter);
        let end = (offset + self.page_size).min(items.len());
        let is_truncated = end < items.len();

        let mut page = ListPage {
            is_truncated,
            next_token: is_truncated.then(|| end.to_string()),
            ..ListPage::default()
        };

        for item in items.into_iter().skip(offset).take(self.page_size) {
            match item {
                Item::Folder(folder) => page.common_prefixes.push(folder),
                Item::Object(entry) => page.entries.push(entry.clone()),
            }
        }

        if let Some(hook) = &self.on_page_served {
            hook(call);
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DELIMITER, Prefix};

    fn request(prefix: &str, token: Option<&str>) -> PageRequest {
        PageRequest {
            prefix: Prefix::new(prefix).unwrap(),
            delimiter: DELIMITER,
            continuation_token: token.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn groups_nested_keys_into_folders() {
        let provider =
            MemoryProvider::new().with_objects(["a/x/1", "a/x/2", "a/y/1", "a/z.txt", "b/1"]);

        let page = provider.list_page(request("a/", None)).await.unwrap();

        assert_eq!(page.common_prefixes, ["a/x/", "a/y/"]);
        assert_eq!(page.entries, [RawEntry::new("a/z.txt")]);
        assert!(!page.is_truncated);
        assert_eq!(page.next_token, None);
    }

    #[tokio::test]
    async fn paginates_with_offset_tokens() {
        let provider = MemoryProvider::new()
            .with_page_size(2)
            .with_objects(["1", "2", "3"]);

        let first = provider.list_page(request("", None)).await.unwrap();
        assert!(first.is_truncated);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = provider.list_page(request("", Some("2"))).await.unwrap();
        assert_eq!(second.entries, [RawEntry::new("3")]);
        assert!(!second.is_truncated);
        assert_eq!(provider.calls().count(), 2);
    }
}
