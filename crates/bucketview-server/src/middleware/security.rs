//! Security middleware for HTTP request protection.
//!
//! CORS rules, security response headers, compression and body limits.
//! The API is read-only so only safe methods are allowed cross-origin.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{self, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::utility::DEFAULT_MAX_BODY_SIZE;

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers security middlewares with the provided configurations.
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self;

    /// Layers security middlewares with default configurations.
    ///
    /// Uses development-friendly CORS settings. For production deployments,
    /// prefer `with_security` with explicit configuration.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors.to_header_values())
            .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::ACCEPT])
            .allow_credentials(cors.allow_credentials)
            .max_age(cors.max_age());

        let mut router = self
            .layer(DefaultBodyLimit::max(DEFAULT_MAX_BODY_SIZE))
            .layer(RequestBodyLimitLayer::new(DEFAULT_MAX_BODY_SIZE))
            .layer(CompressionLayer::new())
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static(headers.frame_options.as_str()),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::REFERRER_POLICY,
                HeaderValue::from_static(headers.referrer_policy.as_str()),
            ));

        if let Ok(hsts) = HeaderValue::from_str(&headers.hsts_header_value()) {
            router = router.layer(SetResponseHeaderLayer::overriding(
                header::STRICT_TRANSPORT_SECURITY,
                hsts,
            ));
        }

        if let Some(csp) = headers.content_security_policy.as_deref() {
            match HeaderValue::from_str(csp) {
                Ok(csp) => {
                    router = router.layer(SetResponseHeaderLayer::overriding(
                        header::CONTENT_SECURITY_POLICY,
                        csp,
                    ));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring invalid content security policy");
                }
            }
        }

        router
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default(), &SecurityHeadersConfig::default())
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    ///
    /// If empty, defaults to localhost origins for development.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,

    /// Whether to allow credentials (the session cookie) in CORS requests.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value = "true")
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    const LOCALHOST_ORIGINS: [&'static str; 4] = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ];

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to header values, falling back to
    /// localhost for development. Unparsable origins are skipped.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            Self::LOCALHOST_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect()
        } else {
            self.allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect()
        }
    }
}

/// Security headers configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityHeadersConfig {
    /// HSTS max age in seconds.
    pub hsts_max_age_seconds: u64,
    pub hsts_include_subdomains: bool,
    /// Content Security Policy directives.
    pub content_security_policy: Option<String>,
    pub frame_options: FrameOptions,
    pub referrer_policy: ReferrerPolicy,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age_seconds: 31_536_000,
            hsts_include_subdomains: true,
            content_security_policy: Some(
                "default-src 'self'; \
                 img-src 'self' data:; \
                 connect-src 'self'; \
                 frame-ancestors 'none'; \
                 base-uri 'self'"
                    .to_owned(),
            ),
            frame_options: FrameOptions::Deny,
            referrer_policy: ReferrerPolicy::StrictOriginWhenCrossOrigin,
        }
    }
}

impl SecurityHeadersConfig {
    pub fn hsts_header_value(&self) -> String {
        if self.hsts_include_subdomains {
            format!("max-age={}; includeSubDomains", self.hsts_max_age_seconds)
        } else {
            format!("max-age={}", self.hsts_max_age_seconds)
        }
    }
}

/// X-Frame-Options header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOptions {
    Deny,
    SameOrigin,
}

impl FrameOptions {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deny => "DENY",
            Self::SameOrigin => "SAMEORIGIN",
        }
    }
}

/// Referrer-Policy header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferrerPolicy {
    NoReferrer,
    Origin,
    StrictOriginWhenCrossOrigin,
}

impl ReferrerPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoReferrer => "no-referrer",
            Self::Origin => "origin",
            Self::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
        }
    }
}
