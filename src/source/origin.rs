// Trusted origin and origin-relative package paths.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::traits::FetchError;
use crate::config::TRUSTED_ORIGIN;

/// A package path relative to the trusted origin, e.g.
/// `/genfiles/javascript/en/corelibs-package-59eab0.js`.
///
/// Never interpreted as an absolute URL: see [`Origin::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcePath(String);

impl ResourcePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourcePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[derive(Debug, Error)]
pub enum OriginError {
    #[error("invalid origin url: {0}")]
    InvalidUrl(String),
    #[error("origin scheme must be http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("origin must be scheme://host[:port] only: {0}")]
    NotBare(String),
}

/// The single host all packages are fetched from.
///
/// Built once at startup and handed to the fetcher by value; there is no way
/// to change it afterwards.
#[derive(Debug, Clone)]
pub struct Origin {
    url: Url,
    base: String,
}

impl Origin {
    /// The compile-time trusted origin.
    pub fn trusted() -> Result<Self, OriginError> {
        Self::parse(TRUSTED_ORIGIN)
    }

    /// Parse a bare `scheme://host[:port]` origin.
    pub fn parse(origin: &str) -> Result<Self, OriginError> {
        let url = Url::parse(origin).map_err(|e| OriginError::InvalidUrl(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(OriginError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none()
            || !url.username().is_empty()
            || url.password().is_some()
            || url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(OriginError::NotBare(origin.to_string()));
        }
        let base = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { url, base })
    }

    /// `scheme://host[:port]` without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Whether `url` points at this origin (same scheme, host and port).
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.url.scheme()
            && url.host_str() == self.url.host_str()
            && url.port_or_known_default() == self.url.port_or_known_default()
            && url.username().is_empty()
            && url.password().is_none()
    }

    /// Build the request target for `path`.
    ///
    /// The path is always appended after a `/`, so nothing in it can reach the
    /// authority part of the URL. The result is re-checked against the origin.
    pub fn resolve(&self, path: &ResourcePath) -> Result<Url, FetchError> {
        let raw = path.as_str();
        let target = if raw.starts_with('/') {
            format!("{}{}", self.base, raw)
        } else {
            format!("{}/{}", self.base, raw)
        };

        let url = Url::parse(&target).map_err(|_| FetchError::OriginEscape {
            path: raw.to_string(),
        })?;
        if !self.contains(&url) {
            return Err(FetchError::OriginEscape {
                path: raw.to_string(),
            });
        }
        Ok(url)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
