//! Listing response with navigation data.

use bucketview_object::prelude::{Breadcrumb, Prefix, QueryResult};
use serde::Serialize;
use url::form_urlencoded;

/// One navigation link above the current listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbResponse {
    /// Segment name with its trailing delimiter.
    pub name: String,
    /// Prefix this link navigates to.
    pub path: String,
    /// Explorer link, e.g. `/?prefix=a%2Fb%2F`.
    pub url: String,
    pub is_current: bool,
}

impl From<Breadcrumb> for BreadcrumbResponse {
    fn from(crumb: Breadcrumb) -> Self {
        Self {
            url: explorer_url(&crumb.path),
            name: crumb.name,
            path: crumb.path.into(),
            is_current: crumb.is_current,
        }
    }
}

/// Everything the explorer renders for one prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// Sanitized prefix that was listed.
    pub prefix: String,
    /// Heading: the last prefix segment, or the bucket name at the root.
    pub title: String,
    pub breadcrumbs: Vec<BreadcrumbResponse>,
    #[serde(flatten)]
    pub result: QueryResult,
}

impl ListingResponse {
    pub fn new(bucket: &str, prefix: &Prefix, result: QueryResult) -> Self {
        Self {
            prefix: prefix.to_string(),
            title: prefix.title().unwrap_or_else(|| bucket.to_owned()),
            breadcrumbs: prefix.breadcrumbs().into_iter().map(Into::into).collect(),
            result,
        }
    }
}

/// Explorer link for `prefix`.
fn explorer_url(prefix: &Prefix) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("prefix", prefix.as_str())
        .finish();
    format!("/?{query}")
}
