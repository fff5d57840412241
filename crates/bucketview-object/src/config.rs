//! Explorer configuration, constructed once at startup and injected.

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::projector::{ExcludePattern, Projector, UrlBuilder};
use crate::providers::S3Credentials;
use crate::types::{Error, Result};

/// Bucket, credentials and projection settings for a listing service.
///
/// Required values are checked when the config is built or validated, so a
/// misconfiguration is reported before the first query.
#[derive(Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[serde(rename_all = "camelCase")]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct ExplorerConfig {
    /// Name of the bucket to browse.
    #[cfg_attr(feature = "config", arg(long = "bucket-name", env = "BUCKET_NAME"))]
    pub bucket: String,

    /// Region the bucket lives in.
    #[cfg_attr(feature = "config", arg(long = "aws-region", env = "AWS_REGION"))]
    pub region: String,

    /// Access key ID for static credentials.
    #[cfg_attr(
        feature = "config",
        arg(long = "aws-access-key-id", env = "AWS_ACCESS_KEY_ID")
    )]
    pub access_key_id: String,

    /// Secret access key for static credentials.
    #[cfg_attr(
        feature = "config",
        arg(long = "aws-secret-access-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub secret_access_key: String,

    /// Session token for temporary credentials.
    #[cfg_attr(
        feature = "config",
        arg(long = "aws-session-token", env = "AWS_SESSION_TOKEN", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    #[builder(default)]
    pub session_token: Option<String>,

    /// Custom endpoint for S3-compatible services (MinIO, LocalStack).
    #[cfg_attr(feature = "config", arg(long = "s3-endpoint", env = "S3_ENDPOINT"))]
    #[serde(default)]
    #[builder(default)]
    pub endpoint: Option<String>,

    /// Regular expression; matching folders and objects are hidden.
    #[cfg_attr(
        feature = "config",
        arg(long = "exclude-pattern", env = "EXCLUDE_PATTERN")
    )]
    #[serde(default)]
    #[builder(default)]
    pub exclude_pattern: Option<String>,

    /// Base URL object download links are built from.
    #[cfg_attr(feature = "config", arg(long = "url-base", env = "URL_BASE"))]
    pub url_base: String,
}

impl ExplorerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Checks every required value and compiles the derived settings.
    pub fn validate(&self) -> Result<()> {
        require("bucket name", &self.bucket)?;
        require("region", &self.region)?;
        require("access key id", &self.access_key_id)?;
        require("secret access key", &self.secret_access_key)?;
        require("url base", &self.url_base)?;
        self.projector().map(|_| ())
    }

    /// Credentials for [`S3Provider`](crate::providers::S3Provider).
    pub fn s3_credentials(&self) -> S3Credentials {
        S3Credentials {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
        }
    }

    /// Builds the projector from the exclusion pattern and URL base.
    pub fn projector(&self) -> Result<Projector> {
        let exclude = ExcludePattern::new(self.exclude_pattern.as_deref())?;
        let urls = UrlBuilder::new(&self.url_base)?;
        Ok(Projector::new(exclude, urls))
    }
}

impl ExplorerConfigBuilder {
    fn validate(builder: &ExplorerConfigBuilder) -> Result<(), String> {
        let required = [
            ("bucket name", &builder.bucket),
            ("region", &builder.region),
            ("access key id", &builder.access_key_id),
            ("secret access key", &builder.secret_access_key),
            ("url base", &builder.url_base),
        ];

        for (name, value) in required {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(format!("{name} cannot be empty"));
            }
        }

        if let Some(Some(pattern)) = &builder.exclude_pattern {
            ExcludePattern::new(Some(pattern)).map_err(|e| e.to_string())?;
        }

        if let Some(url_base) = &builder.url_base {
            UrlBuilder::new(url_base).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(value: derive_builder::UninitializedFieldError) -> Self {
        Error::config(format!("{} is required", value.field_name()))
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::config(value)
    }
}

impl std::fmt::Debug for ExplorerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("endpoint", &self.endpoint)
            .field("exclude_pattern", &self.exclude_pattern)
            .field("url_base", &self.url_base)
            .finish_non_exhaustive()
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::config(format!("{name} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    fn builder() -> ExplorerConfigBuilder {
        ExplorerConfig::builder()
            .with_bucket("files")
            .with_region("eu-west-1")
            .with_access_key_id("AKIA")
            .with_secret_access_key("secret")
            .with_url_base("http://files")
    }

    #[test]
    fn builds_complete_config() {
        let config = builder().with_exclude_pattern("^private/").build().unwrap();
        assert_eq!(config.bucket, "files");
        assert!(config.validate().is_ok());

        let projector = config.projector().unwrap();
        assert!(projector.exclude_pattern().is_excluded("private/a"));
    }

    #[test]
    fn missing_required_value_is_config_error() {
        let error = ExplorerConfig::builder()
            .with_bucket("files")
            .with_url_base("http://files")
            .build()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn empty_required_value_is_config_error() {
        let error = builder().with_secret_access_key("").build().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(error.to_string().contains("secret access key"));
    }

    #[test]
    fn invalid_pattern_fails_validation() {
        assert!(builder().with_exclude_pattern("[").build().is_err());
    }

    #[test]
    fn invalid_url_base_fails_validation() {
        assert!(builder().with_url_base("files").build().is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let config = builder().with_session_token("tok-123").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("tok-123"));
    }
}
