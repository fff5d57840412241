//! Raw listing data as returned by the remote, before projection.

use jiff::Timestamp;

use super::Prefix;

/// One object key reported by the remote.
///
/// Every field is optional because the remote does not guarantee them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub key: Option<String>,
    pub last_modified: Option<Timestamp>,
    pub size: Option<u64>,
}

impl RawEntry {
    /// Entry with a key and no metadata.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Fully materialized listing for a single prefix, accumulated across every
/// page in the order the remote returned them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub common_prefixes: Vec<String>,
    pub entries: Vec<RawEntry>,
}

impl RawListing {
    /// Appends a page's contents, preserving order.
    pub fn extend(&mut self, page: ListPage) {
        self.common_prefixes.extend(page.common_prefixes);
        self.entries.extend(page.entries);
    }
}

/// Parameters of a single remote list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub prefix: Prefix,
    pub delimiter: char,
    pub continuation_token: Option<String>,
}

/// One page of a remote listing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListPage {
    pub common_prefixes: Vec<String>,
    pub entries: Vec<RawEntry>,
    /// Whether more pages follow this one.
    pub is_truncated: bool,
    /// Token to request the next page with.
    pub next_token: Option<String>,
}
