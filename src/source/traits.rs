use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use super::origin::ResourcePath;

/// Why a single package could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{path}: path does not resolve under the trusted origin")]
    OriginEscape { path: String },
    #[error("{path}: request failed: {reason}")]
    Transport { path: String, reason: String },
    #[error("{path}: HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("{path}: reading body failed: {reason}")]
    Body { path: String, reason: String },
    #[error("{path}: body is not valid UTF-8")]
    Decode { path: String },
}

impl FetchError {
    /// The package path the failed fetch was for.
    pub fn path(&self) -> &str {
        match self {
            Self::OriginEscape { path }
            | Self::Transport { path, .. }
            | Self::Status { path, .. }
            | Self::Body { path, .. }
            | Self::Decode { path } => path,
        }
    }
}

#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Retrieve the raw body of one package.
    ///
    /// Nothing is cached, so `bust_cache` changes no local behavior. Its only
    /// effect is that [`OriginFetcher`](super::http_source::OriginFetcher)
    /// sends `Cache-Control: no-cache` and `Pragma: no-cache` upstream.
    async fn fetch(&self, path: &ResourcePath, bust_cache: bool) -> Result<Bytes, FetchError>;
}
