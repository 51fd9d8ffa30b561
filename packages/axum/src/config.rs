//! HAL layer configuration, populated from environment variables.

use std::net::SocketAddr;

use halkit::SelfLinkPolicy;
use thiserror::Error;

/// Errors raised while reading [`HalConfig`] from the environment.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("HALKIT_BIND must be a valid socket address (e.g. 0.0.0.0:3000), got {0:?}")]
    InvalidBind(String),

    #[error("HALKIT_SELF_LINK: {0}")]
    InvalidPolicy(String),

    #[error("HALKIT_SCHEME must be http or https, got {0:?}")]
    InvalidScheme(String),

    #[error("HALKIT_TRUST_FORWARDED must be true or false, got {0:?}")]
    InvalidTrustForwarded(String),
}

/// Runtime configuration for serving HAL documents.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `HALKIT_BIND` | `0.0.0.0:3000` | TCP socket address the demo server listens on |
/// | `HALKIT_CANONICAL_HOST` | (absent) | Canonical server name; with `auto`, self links become path-only |
/// | `HALKIT_SELF_LINK` | `auto` | Self link policy: `auto`, `path` or `absolute` |
/// | `HALKIT_SCHEME` | `http` | Scheme assumed when the request URI has none |
/// | `HALKIT_TRUST_FORWARDED` | `false` | Honour `X-Forwarded-Proto` and `X-Forwarded-Host` |
#[derive(Debug, Clone, PartialEq)]
pub struct HalConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Canonical server name of the application.
    pub canonical_host: Option<String>,

    /// How `self` links are derived from each request.
    pub self_link: SelfLinkPolicy,

    /// Scheme used to rebuild absolute request URLs.
    pub scheme: String,

    /// Whether proxy headers may override the scheme and host. Only enable
    /// behind a proxy that overwrites them.
    pub trust_forwarded: bool,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            canonical_host: None,
            self_link: SelfLinkPolicy::Auto,
            scheme: "http".into(),
            trust_forwarded: false,
        }
    }
}

impl HalConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading variables through
    /// `lookup`, so callers can supply their own source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup("HALKIT_BIND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidBind(raw))?,
            None => defaults.bind_addr,
        };

        let self_link = match lookup("HALKIT_SELF_LINK") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidPolicy)?,
            None => defaults.self_link,
        };

        let scheme = match lookup("HALKIT_SCHEME") {
            Some(raw) if raw == "http" || raw == "https" => raw,
            Some(raw) => return Err(ConfigError::InvalidScheme(raw)),
            None => defaults.scheme,
        };

        let trust_forwarded = match lookup("HALKIT_TRUST_FORWARDED").as_deref() {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            Some(raw) => return Err(ConfigError::InvalidTrustForwarded(raw.to_owned())),
            None => defaults.trust_forwarded,
        };

        Ok(Self {
            bind_addr,
            canonical_host: lookup("HALKIT_CANONICAL_HOST").filter(|h| !h.is_empty()),
            self_link,
            scheme,
            trust_forwarded,
        })
    }
}
