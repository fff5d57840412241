//! Download URL derivation.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::types::{DELIMITER, Error, Result};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Builds object URLs by appending percent-encoded path segments to a base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: Url,
}

impl UrlBuilder {
    /// Parses and validates the base URL.
    ///
    /// The base must be hierarchical (e.g. `https://files.example.com/` or
    /// `http://bucket/downloads/`) so that paths can be appended to it.
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::config(format!("invalid url base '{base}'")).with_source(e))?;

        if base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "url base '{base}' cannot carry a path"
            )));
        }

        if base.query().is_some() || base.fragment().is_some() {
            return Err(Error::config(format!(
                "url base '{base}' must not have a query or fragment"
            )));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL for a remote path. Each delimiter-separated segment is
    /// percent-encoded; a trailing delimiter is preserved.
    ///
    /// `.` and `..` are legal key segments, so they are written as `%2E` and
    /// `%2E%2E`. The result is assembled as text because parsing it again
    /// would resolve those segments away.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base.as_str();
        let mut url = String::with_capacity(base.len() + path.len() + 1);
        url.push_str(base);
        if !url.ends_with(DELIMITER) {
            url.push(DELIMITER);
        }

        for (index, segment) in path.split(DELIMITER).enumerate() {
            if index > 0 {
                url.push(DELIMITER);
            }

            match segment {
                "." => url.push_str("%2E"),
                ".." => url.push_str("%2E%2E"),
                segment => url.extend(utf8_percent_encode(segment, SEGMENT)),
            }
        }

        url
    }
}
