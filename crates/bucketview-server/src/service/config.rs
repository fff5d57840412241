use bucketview_object::{ExplorerConfig, ListingService};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::service::{Result, SessionKeys, SessionKeysConfig};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Bucket, credentials and projection settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub explorer: ExplorerConfig,

    /// Session token verification.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(default)]
    pub session: SessionKeysConfig,
}

impl ServiceConfig {
    pub fn new(explorer: ExplorerConfig, session: SessionKeysConfig) -> Self {
        Self { explorer, session }
    }

    /// Validates settings that can be checked without network access.
    pub fn validate(&self) -> Result<()> {
        self.explorer.validate()?;
        Ok(())
    }

    /// Connects the listing service to the configured bucket.
    pub async fn connect_listing(&self) -> Result<ListingService> {
        Ok(ListingService::connect(&self.explorer).await?)
    }

    /// Loads the session verification keys.
    pub async fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_config(&self.session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn validate_reports_missing_bucket() {
        let explorer = ExplorerConfig {
            bucket: String::new(),
            region: "us-east-1".to_owned(),
            access_key_id: "AKIA".to_owned(),
            secret_access_key: "secret".to_owned(),
            session_token: None,
            endpoint: None,
            exclude_pattern: None,
            url_base: "https://files.example.com".to_owned(),
        };

        let config = ServiceConfig::new(explorer, SessionKeysConfig::default());
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
