//! S3-compatible provider using [`aws_sdk_s3`].
//!
//! Works with AWS S3, MinIO, LocalStack and any S3-compatible service that
//! implements `ListObjectsV2`.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::DateTime;
use derive_more::Deref;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Client;
use crate::client::ListPages;
use crate::types::{Error, ListPage, PageRequest, RawEntry, Result};

const TRACING_TARGET: &str = "bucketview_object::providers::s3";

/// Typed credentials for the S3-compatible provider.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// S3 bucket name.
    pub bucket: String,
    /// AWS region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL (e.g. `http://localhost:9000` for MinIO).
    /// Required for non-AWS S3-compatible services.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID for static credentials.
    pub access_key_id: String,
    /// Secret access key for static credentials.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    #[serde(default)]
    pub session_token: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .finish()
    }
}

/// S3-backed listing client bound to a single bucket.
#[derive(Debug, Clone, Deref)]
pub struct S3Provider {
    #[deref]
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Provider {
    /// Wrap an existing SDK client.
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Bucket every request is issued against.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait::async_trait]
impl Client for S3Provider {
    type Credentials = S3Credentials;

    const ID: &str = "s3";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        if creds.bucket.is_empty() {
            return Err(Error::config("s3 bucket name is empty"));
        }

        let credentials = Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            creds.session_token.clone(),
            None,
            "bucketview",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(creds.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &creds.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;

        // Custom endpoints (MinIO, LocalStack) rarely support virtual-hosted buckets.
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(creds.endpoint.is_some())
            .build();

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %creds.bucket,
            region = %creds.region,
            endpoint = creds.endpoint.as_deref().unwrap_or("default"),
            "s3 client configured"
        );

        Ok(Self::new(aws_sdk_s3::Client::from_conf(config), &creds.bucket))
    }
}

#[async_trait::async_trait]
impl ListPages for S3Provider {
    async fn list_page(&self, request: PageRequest) -> Result<ListPage> {
        let prefix = request.prefix.as_str();

        let mut call = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter(request.delimiter.to_string());

        if !request.prefix.is_root() {
            call = call.prefix(prefix);
        }

        if let Some(token) = &request.continuation_token {
            call = call.continuation_token(token);
        }

        let output = call.send().await.map_err(|e| {
            let retryable = e.as_service_error().is_none();
            Error::upstream(
                format!("ListObjectsV2 on bucket '{}' failed", self.bucket),
                prefix,
                retryable,
            )
            .with_source(e)
        })?;

        let common_prefixes = output
            .common_prefixes()
            .iter()
            .filter_map(|common| {
                let value = common.prefix().map(str::to_owned);
                if value.is_none() {
                    tracing::debug!(target: TRACING_TARGET, "skipping common prefix without value");
                }
                value
            })
            .collect();

        let entries = output
            .contents()
            .iter()
            .map(|object| RawEntry {
                key: object.key().map(str::to_owned),
                last_modified: object.last_modified().and_then(to_timestamp),
                size: object.size().and_then(|size| u64::try_from(size).ok()),
            })
            .collect();

        Ok(ListPage {
            common_prefixes,
            entries,
            is_truncated: output.is_truncated().unwrap_or(false),
            next_token: output.next_continuation_token().map(str::to_owned),
        })
    }
}

fn to_timestamp(value: &DateTime) -> Option<Timestamp> {
    Timestamp::new(value.secs(), value.subsec_nanos() as i32).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_default_region() {
        let creds: S3Credentials = serde_json::from_value(serde_json::json!({
            "bucket": "files",
            "accessKeyId": "AKIA",
            "secretAccessKey": "secret",
        }))
        .unwrap();

        assert_eq!(creds.region, "us-east-1");
        assert!(creds.endpoint.is_none());
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = S3Credentials {
            bucket: "files".into(),
            region: "eu-west-1".into(),
            endpoint: None,
            access_key_id: "AKIA".into(),
            secret_access_key: "super-secret".into(),
            session_token: Some("tok-123".into()),
        };

        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("tok-123"));
    }

    #[test]
    fn converts_sdk_timestamps() {
        let converted = to_timestamp(&DateTime::from_secs(1_700_000_000)).unwrap();
        assert_eq!(converted.as_second(), 1_700_000_000);
    }

    #[tokio::test]
    async fn connect_rejects_empty_bucket() {
        let creds = S3Credentials {
            bucket: String::new(),
            region: "us-east-1".into(),
            endpoint: None,
            access_key_id: "AKIA".into(),
            secret_access_key: "secret".into(),
            session_token: None,
        };

        let error = S3Provider::connect(&creds).await.unwrap_err();
        assert_eq!(error.kind(), crate::types::ErrorKind::Config);
    }
}
