//! Path exclusion pattern.

use regex::Regex;

use crate::types::{Error, Result};

/// Regular expression matched against full remote paths.
///
/// An unset or empty pattern excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct ExcludePattern(Option<Regex>);

impl ExcludePattern {
    /// Pattern that excludes nothing.
    pub const fn none() -> Self {
        Self(None)
    }

    /// Compiles `pattern`, treating `None` and `""` as "exclude nothing".
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        match pattern {
            None | Some("") => Ok(Self::none()),
            Some(pattern) => Regex::new(pattern).map(|re| Self(Some(re))).map_err(|e| {
                Error::config(format!("invalid exclude pattern '{pattern}'")).with_source(e)
            }),
        }
    }

    /// Whether `path` is excluded. Unanchored, like a regex search.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.0.as_ref().is_some_and(|re| re.is_match(path))
    }

    /// Source text of the compiled pattern, if any.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_ref().map(Regex::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_empty_exclude_nothing() {
        for pattern in [None, Some("")] {
            let exclude = ExcludePattern::new(pattern).unwrap();
            assert!(!exclude.is_excluded(""));
            assert!(!exclude.is_excluded("anything/at/all"));
        }
    }

    #[test]
    fn matches_anywhere_in_path() {
        let exclude = ExcludePattern::new(Some(r"\.tmp$")).unwrap();
        assert!(exclude.is_excluded("a/b.tmp"));
        assert!(!exclude.is_excluded("a/b.tmp.txt"));
    }

    #[test]
    fn invalid_regex_is_config_error() {
        let error = ExcludePattern::new(Some("(unclosed")).unwrap_err();
        assert_eq!(error.kind(), crate::types::ErrorKind::Config);
    }
}
