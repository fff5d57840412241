//! Position in a bucket's virtual folder hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Separator used to group keys into virtual folders.
pub const DELIMITER: char = '/';

/// A validated listing prefix.
///
/// The empty prefix denotes the bucket root; any other prefix ends with
/// [`DELIMITER`]. A prefix is never an absolute URL.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prefix(String);

/// One navigation step derived from a [`Prefix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    /// Segment name with its trailing delimiter, e.g. `photos/`.
    pub name: String,
    /// Prefix up to and including this segment.
    pub path: Prefix,
    /// Whether this is the last segment of the prefix.
    pub is_current: bool,
}

impl Prefix {
    /// Bucket root.
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Validates `raw` against the prefix invariant.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.contains("://") {
            return Err(Error::invalid_prefix(format!(
                "'{raw}' looks like an absolute URL"
            )));
        }

        if !raw.is_empty() && !raw.ends_with(DELIMITER) {
            return Err(Error::invalid_prefix(format!(
                "'{raw}' must be empty or end with '{DELIMITER}'"
            )));
        }

        Ok(Self(raw))
    }

    /// Normalizes user input into a prefix.
    ///
    /// Surrounding whitespace and leading delimiters are removed, and a
    /// trailing delimiter is appended to non-empty input.
    pub fn sanitize(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_start_matches(DELIMITER);
        if trimmed.is_empty() || trimmed.ends_with(DELIMITER) {
            return Self::new(trimmed);
        }

        Self::new(format!("{trimmed}{DELIMITER}"))
    }

    /// Whether this is the bucket root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the remainder of `path` after this prefix, if `path` lies
    /// underneath it.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.0.as_str())
    }

    /// Display name of `path` listed under this prefix: `path` with as many
    /// leading characters dropped as the prefix has.
    ///
    /// A path the remote returned outside the prefix keeps the same rule.
    pub fn relative_name(&self, path: &str) -> String {
        match self.strip(path) {
            Some(rest) => rest.to_owned(),
            None => path.chars().skip(self.0.chars().count()).collect(),
        }
    }

    /// Last segment with its trailing delimiter, or `None` at the root.
    pub fn title(&self) -> Option<String> {
        self.segments()
            .last()
            .map(|segment| format!("{segment}{DELIMITER}"))
    }

    /// Navigation steps from the first segment down to this prefix.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let segments: Vec<&str> = self.segments().collect();
        let mut path = String::with_capacity(self.0.len());

        segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                path.push_str(segment);
                path.push(DELIMITER);
                Breadcrumb {
                    name: format!("{segment}{DELIMITER}"),
                    path: Self(path.clone()),
                    is_current: index + 1 == segments.len(),
                }
            })
            .collect()
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0
            .strip_suffix(DELIMITER)
            .into_iter()
            .flat_map(|inner| inner.split(DELIMITER))
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Prefix {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Prefix> for String {
    fn from(value: Prefix) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_root_and_delimited_prefixes() {
        assert!(Prefix::new("").unwrap().is_root());
        assert_eq!(Prefix::new("a/b/").unwrap().as_str(), "a/b/");
    }

    #[test]
    fn rejects_prefix_without_trailing_delimiter() {
        let error = Prefix::new("a/b").unwrap_err();
        assert_eq!(error.kind(), crate::types::ErrorKind::InvalidPrefix);
    }

    #[test]
    fn rejects_absolute_url() {
        assert!(Prefix::new("https://bucket.example.com/a/").is_err());
    }

    #[test]
    fn sanitize_normalizes_user_input() {
        assert_eq!(Prefix::sanitize("").unwrap(), Prefix::root());
        assert_eq!(Prefix::sanitize("  ").unwrap(), Prefix::root());
        assert_eq!(Prefix::sanitize("/photos").unwrap().as_str(), "photos/");
        assert_eq!(Prefix::sanitize(" a/b/ ").unwrap().as_str(), "a/b/");
    }

    #[test]
    fn breadcrumbs_mark_last_segment_current() {
        let prefix = Prefix::new("a/b/c/").unwrap();
        let crumbs = prefix.breadcrumbs();

        let names: Vec<_> = crumbs.iter().map(|c| c.name.as_str()).collect();
        let paths: Vec<_> = crumbs.iter().map(|c| c.path.as_str()).collect();
        let current: Vec<_> = crumbs.iter().map(|c| c.is_current).collect();

        assert_eq!(names, ["a/", "b/", "c/"]);
        assert_eq!(paths, ["a/", "a/b/", "a/b/c/"]);
        assert_eq!(current, [false, false, true]);
    }

    #[test]
    fn root_has_no_breadcrumbs_or_title() {
        assert!(Prefix::root().breadcrumbs().is_empty());
        assert_eq!(Prefix::root().title(), None);
        assert_eq!(Prefix::new("a/b/").unwrap().title().as_deref(), Some("b/"));
    }

    #[test]
    fn strip_removes_prefix_only_when_nested() {
        let prefix = Prefix::new("a/").unwrap();
        assert_eq!(prefix.strip("a/x.txt"), Some("x.txt"));
        assert_eq!(prefix.strip("b/x.txt"), None);
    }

    #[test]
    fn relative_name_drops_prefix_length() {
        let prefix = Prefix::new("docs/").unwrap();
        assert_eq!(prefix.relative_name("docs/"), "");
        assert_eq!(prefix.relative_name("docs/a.txt"), "a.txt");
        assert_eq!(prefix.relative_name("elsewhere.txt"), "here.txt");
        assert_eq!(prefix.relative_name("déjà"), "");
        assert_eq!(Prefix::root().relative_name("x/"), "x/");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Prefix = serde_json::from_str("\"a/\"").unwrap();
        assert_eq!(ok.as_str(), "a/");
        assert!(serde_json::from_str::<Prefix>("\"a\"").is_err());
    }
}
