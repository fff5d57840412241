//! Verification keys for session tokens.
//!
//! The explorer never issues sessions. Tokens are minted by an external
//! identity provider and only verified here, so a single decoding key is
//! loaded at startup.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, TRACING_TARGET_SESSION_KEYS};

/// Signature algorithm of the session tokens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SessionAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256. Expects an RSA public key PEM.
    #[default]
    Rs256,
    /// ECDSA P-256 with SHA-256. Expects an EC public key PEM.
    Es256,
    /// Ed25519. Expects an Ed25519 public key PEM.
    #[cfg_attr(feature = "config", value(name = "eddsa"))]
    EdDsa,
    /// HMAC with SHA-256. The key file holds the shared secret.
    Hs256,
}

impl SessionAlgorithm {
    /// Returns the matching [`jsonwebtoken`] algorithm.
    pub const fn as_jwt(self) -> Algorithm {
        match self {
            Self::Rs256 => Algorithm::RS256,
            Self::Es256 => Algorithm::ES256,
            Self::EdDsa => Algorithm::EdDSA,
            Self::Hs256 => Algorithm::HS256,
        }
    }

    fn parse_key(self, data: &[u8]) -> jsonwebtoken::errors::Result<DecodingKey> {
        match self {
            Self::Rs256 => DecodingKey::from_rsa_pem(data),
            Self::Es256 => DecodingKey::from_ec_pem(data),
            Self::EdDsa => DecodingKey::from_ed_pem(data),
            Self::Hs256 => Ok(DecodingKey::from_secret(data.trim_ascii())),
        }
    }
}

/// Session key configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SessionKeysConfig {
    /// File path to the key used to verify session tokens.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AUTH_DECODING_KEY_FILEPATH", default_value = "./public.pem")
    )]
    #[serde(default = "SessionKeysConfig::default_decoding_key")]
    pub decoding_key: PathBuf,

    /// Signature algorithm of the session tokens.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AUTH_ALGORITHM", value_enum, default_value = "rs256")
    )]
    #[serde(default)]
    pub algorithm: SessionAlgorithm,

    /// Required `iss` claim, if any.
    #[cfg_attr(feature = "config", arg(long, env = "AUTH_ISSUER"))]
    #[serde(default)]
    pub issuer: Option<String>,
}

impl Default for SessionKeysConfig {
    fn default() -> Self {
        Self {
            decoding_key: Self::default_decoding_key(),
            algorithm: SessionAlgorithm::default(),
            issuer: None,
        }
    }
}

impl SessionKeysConfig {
    fn default_decoding_key() -> PathBuf {
        "./public.pem".into()
    }

    /// Builds the token validation rules for this configuration.
    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm.as_jwt());
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = self.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

/// Keys used to verify session tokens.
///
/// Cheap to clone; the parsed key is shared.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    validation: Validation,
    config: SessionKeysConfig,
}

impl SessionKeys {
    /// Loads the decoding key described by `config`.
    pub async fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        Self::validate_config(config)?;

        tracing::debug!(
            target: TRACING_TARGET_SESSION_KEYS,
            decoding_key_path = %config.decoding_key.display(),
            algorithm = ?config.algorithm,
            "loading session keys",
        );

        let decoding_key = Self::load_decoding_key(&config.decoding_key, config.algorithm).await?;

        tracing::info!(
            target: TRACING_TARGET_SESSION_KEYS,
            algorithm = ?config.algorithm,
            "session keys loaded",
        );

        Ok(Self::from_parts(decoding_key, config.clone()))
    }

    /// Creates keys for HS256 tokens signed with a shared `secret`.
    pub fn from_secret(secret: &[u8]) -> Self {
        let config = SessionKeysConfig {
            algorithm: SessionAlgorithm::Hs256,
            ..SessionKeysConfig::default()
        };
        Self::from_parts(DecodingKey::from_secret(secret), config)
    }

    fn from_parts(decoding_key: DecodingKey, config: SessionKeysConfig) -> Self {
        let inner = Arc::new(SessionKeysInner {
            decoding_key,
            validation: config.validation(),
            config,
        });

        Self { inner }
    }

    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    #[inline]
    pub fn validation(&self) -> &Validation {
        &self.inner.validation
    }

    #[inline]
    pub fn config(&self) -> &SessionKeysConfig {
        &self.inner.config
    }

    fn validate_config(config: &SessionKeysConfig) -> Result<()> {
        if !config.decoding_key.exists() {
            return Err(Error::config("Decoding key file does not exist"));
        }

        if !config.decoding_key.is_file() {
            return Err(Error::config("Decoding key path is not a file"));
        }

        if config.issuer.as_deref().is_some_and(str::is_empty) {
            return Err(Error::config("Session issuer cannot be empty"));
        }

        Ok(())
    }

    async fn load_decoding_key(path: &Path, algorithm: SessionAlgorithm) -> Result<DecodingKey> {
        let pem_data = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_SESSION_KEYS,
                path = %path.display(),
                error = %e,
                "failed to read decoding key file",
            );
            Error::file_system("failed to read decoding key file").with_source(e)
        })?;

        let key = algorithm.parse_key(&pem_data).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_SESSION_KEYS,
                path = %path.display(),
                error = %e,
                "failed to parse decoding key",
            );
            Error::auth("invalid decoding key format").with_source(e)
        })?;

        Ok(key)
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
