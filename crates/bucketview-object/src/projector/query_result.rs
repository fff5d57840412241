//! Projected listing entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A virtual folder synthesized from delimiter grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Path relative to the requesting prefix, with its trailing delimiter.
    pub name: String,
    /// Full remote prefix of the folder.
    pub path: String,
    pub url: String,
}

/// A stored object at the requesting prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    /// Key relative to the requesting prefix.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Full remote key.
    pub path: String,
    pub url: String,
}

/// Folders and objects directly under one prefix, in remote order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub folders: Vec<Folder>,
    pub objects: Vec<ObjectEntry>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.objects.is_empty()
    }
}
