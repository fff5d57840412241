//! Pure projection of a raw listing into folders and objects.
//!
//! The [`Projector`] applies the exclusion pattern to full remote paths,
//! strips the requesting prefix to derive display names and builds download
//! URLs. It never re-sorts or de-duplicates what the remote returned.

mod exclude;
mod query_result;
mod url_builder;

pub use exclude::ExcludePattern;
pub use query_result::{Folder, ObjectEntry, QueryResult};
pub use url_builder::UrlBuilder;

use crate::types::{Prefix, RawListing};

const TRACING_TARGET: &str = "bucketview_object::projector";

/// Turns a [`RawListing`] into a [`QueryResult`].
#[derive(Debug, Clone)]
pub struct Projector {
    exclude: ExcludePattern,
    urls: UrlBuilder,
}

impl Projector {
    pub fn new(exclude: ExcludePattern, urls: UrlBuilder) -> Self {
        Self { exclude, urls }
    }

    pub fn exclude_pattern(&self) -> &ExcludePattern {
        &self.exclude
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Projects `raw`, as listed under `prefix`.
    ///
    /// Only entries without a key and paths matching the exclusion pattern
    /// are dropped. The marker object of `prefix` itself is emitted with an
    /// empty name.
    pub fn project(&self, prefix: &Prefix, raw: RawListing) -> QueryResult {
        let folders = raw
            .common_prefixes
            .into_iter()
            .filter(|path| !self.exclude.is_excluded(path))
            .map(|path| {
                if prefix.strip(&path).is_none() {
                    tracing::debug!(target: TRACING_TARGET, %path, "folder outside prefix");
                }

                Folder {
                    name: prefix.relative_name(&path),
                    url: self.urls.url_for(&path),
                    path,
                }
            })
            .collect();

        let objects = raw
            .entries
            .into_iter()
            .filter_map(|entry| {
                let Some(path) = entry.key.filter(|key| !key.is_empty()) else {
                    tracing::debug!(target: TRACING_TARGET, "entry without key skipped");
                    return None;
                };

                if self.exclude.is_excluded(&path) {
                    return None;
                }

                if prefix.strip(&path).is_none() {
                    tracing::debug!(target: TRACING_TARGET, %path, "entry outside prefix");
                }

                Some(ObjectEntry {
                    name: prefix.relative_name(&path),
                    last_modified: entry.last_modified,
                    size: entry.size,
                    url: self.urls.url_for(&path),
                    path,
                })
            })
            .collect();

        QueryResult { folders, objects }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::types::RawEntry;

    fn projector(exclude: Option<&str>) -> Projector {
        Projector::new(
            ExcludePattern::new(exclude).unwrap(),
            UrlBuilder::new("http://my-bucket").unwrap(),
        )
    }

    #[test]
    fn root_listing() {
        let modified: Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        let raw = RawListing {
            common_prefixes: vec!["a/".into(), "b/".into()],
            entries: vec![RawEntry::new("x.txt").with_size(10).with_last_modified(modified)],
        };

        let result = projector(None).project(&Prefix::root(), raw);

        assert_eq!(
            result.folders,
            [
                Folder {
                    name: "a/".into(),
                    path: "a/".into(),
                    url: "http://my-bucket/a/".into(),
                },
                Folder {
                    name: "b/".into(),
                    path: "b/".into(),
                    url: "http://my-bucket/b/".into(),
                },
            ]
        );
        assert_eq!(
            result.objects,
            [ObjectEntry {
                name: "x.txt".into(),
                last_modified: Some(modified),
                size: Some(10),
                path: "x.txt".into(),
                url: "http://my-bucket/x.txt".into(),
            }]
        );
    }

    #[test]
    fn nested_listing_with_exclusion() {
        let raw = RawListing {
            common_prefixes: vec!["a/b/".into(), "a/tmp/".into()],
            entries: vec![RawEntry::new("a/c.log"), RawEntry::new("a/d.txt")],
        };

        let result = projector(Some(r"tmp/|\.log$")).project(&Prefix::new("a/").unwrap(), raw);

        let folders: Vec<_> = result.folders.iter().map(|f| f.name.as_str()).collect();
        let objects: Vec<_> = result.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(folders, ["b/"]);
        assert_eq!(objects, ["d.txt"]);
        assert_eq!(result.objects[0].path, "a/d.txt");
    }

    #[test]
    fn missing_metadata_is_not_defaulted() {
        let raw = RawListing {
            common_prefixes: Vec::new(),
            entries: vec![RawEntry::new("y.bin")],
        };

        let result = projector(None).project(&Prefix::root(), raw);
        let object = &result.objects[0];
        assert_eq!(object.last_modified, None);
        assert_eq!(object.size, None);

        let json = serde_json::to_value(object).unwrap();
        assert!(json.get("lastModified").is_none());
        assert!(json.get("size").is_none());
    }

    #[test]
    fn entries_without_key_are_skipped() {
        let raw = RawListing {
            common_prefixes: Vec::new(),
            entries: vec![
                RawEntry::default().with_size(3),
                RawEntry::new(""),
                RawEntry::new("ok.txt"),
            ],
        };

        let result = projector(None).project(&Prefix::root(), raw);
        assert_eq!(result.objects.len(), 1);
        assert_eq!(result.objects[0].name, "ok.txt");
    }

    #[test]
    fn prefix_marker_object_is_emitted_with_empty_name() {
        let raw = RawListing {
            common_prefixes: Vec::new(),
            entries: vec![
                RawEntry::new("docs/").with_size(0),
                RawEntry::new("docs/readme.md"),
            ],
        };

        let result = projector(None).project(&Prefix::new("docs/").unwrap(), raw);

        assert_eq!(result.objects.len(), 2);
        let marker = &result.objects[0];
        assert_eq!(marker.name, "");
        assert_eq!(marker.path, "docs/");
        assert_eq!(marker.size, Some(0));
        assert_eq!(marker.url, "http://my-bucket/docs/");
        assert_eq!(result.objects[1].name, "readme.md");
    }

    #[test]
    fn entries_outside_prefix_are_emitted() {
        let raw = RawListing {
            common_prefixes: vec!["other/x/".into()],
            entries: vec![RawEntry::new("elsewhere.txt")],
        };

        let result = projector(None).project(&Prefix::new("docs/").unwrap(), raw);

        assert_eq!(result.folders.len(), 1);
        assert_eq!(result.folders[0].path, "other/x/");
        assert_eq!(result.folders[0].name, "/x/");
        assert_eq!(result.objects.len(), 1);
        assert_eq!(result.objects[0].name, "here.txt");
    }

    #[test]
    fn dot_segment_keys_keep_distinct_urls() {
        let raw = RawListing {
            common_prefixes: vec!["a/../".into()],
            entries: vec![RawEntry::new("a/./b.txt"), RawEntry::new("a/../b.txt")],
        };

        let result = projector(None).project(&Prefix::root(), raw);

        assert_eq!(result.folders[0].url, "http://my-bucket/a/%2E%2E/");
        assert_eq!(result.objects[0].url, "http://my-bucket/a/%2E/b.txt");
        assert_eq!(result.objects[1].url, "http://my-bucket/a/%2E%2E/b.txt");
    }

    #[test]
    fn names_are_paths_minus_prefix() {
        let prefix = Prefix::new("deep/er/").unwrap();
        let raw = RawListing {
            common_prefixes: vec!["deep/er/x/".into(), "deep/er/y/".into()],
            entries: vec![RawEntry::new("deep/er/one"), RawEntry::new("deep/er/two")],
        };

        let result = projector(None).project(&prefix, raw);

        for folder in &result.folders {
            assert!(folder.path.starts_with(prefix.as_str()));
            assert_eq!(folder.name, folder.path[prefix.as_str().len()..]);
        }
        for object in &result.objects {
            assert!(object.path.starts_with(prefix.as_str()));
            assert_eq!(object.name, object.path[prefix.as_str().len()..]);
        }
    }

    #[test]
    fn exclusion_is_exhaustive_and_order_preserved() {
        let raw = RawListing {
            common_prefixes: vec!["z/".into(), "private/".into(), "a/".into()],
            entries: vec![
                RawEntry::new("z.txt"),
                RawEntry::new("private.txt"),
                RawEntry::new("a.txt"),
            ],
        };

        let result = projector(Some("private")).project(&Prefix::root(), raw);

        let folders: Vec<_> = result.folders.iter().map(|f| f.path.as_str()).collect();
        let objects: Vec<_> = result.objects.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(folders, ["z/", "a/"]);
        assert_eq!(objects, ["z.txt", "a.txt"]);
    }
}
