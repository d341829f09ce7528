use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, warn};

use super::origin::{Origin, ResourcePath};
use super::traits::{FetchError, PackageSource};
use crate::config::MAX_REDIRECTS;

/// Fetches packages over HTTP from one fixed [`Origin`].
///
/// One GET per call. No retries and no caching.
pub struct OriginFetcher {
    client: Client,
    origin: Origin,
}

impl OriginFetcher {
    pub fn new(origin: Origin, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().redirect(same_origin_redirects(origin.clone()));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            origin,
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Build the GET for `url`, asking intermediaries for a fresh copy when
    /// `bust_cache` is set.
    fn build_request(&self, url: Url, bust_cache: bool) -> RequestBuilder {
        let req = self.client.get(url);
        if bust_cache {
            req.header(CACHE_CONTROL, "no-cache").header(PRAGMA, "no-cache")
        } else {
            req
        }
    }
}

/// Follow redirects only while they stay on `origin`.
fn same_origin_redirects(origin: Origin) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.stop()
        } else if origin.contains(attempt.url()) {
            attempt.follow()
        } else {
            warn!(
                "refusing cross-origin redirect to {} (origin {})",
                attempt.url(),
                origin
            );
            attempt.stop()
        }
    })
}

#[async_trait]
impl PackageSource for OriginFetcher {
    async fn fetch(&self, path: &ResourcePath, bust_cache: bool) -> Result<Bytes, FetchError> {
        let url = self.origin.resolve(path)?;
        debug!("fetch package url={} bust_cache={}", url, bust_cache);

        let resp = self
            .build_request(url, bust_cache)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("fetch package failed status={} path={}", status.as_u16(), path);
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| FetchError::Body {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        debug!("fetched package path={} bytes={}", path, body.len());
        Ok(body)
    }
}
