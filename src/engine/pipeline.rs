// Fan-out fetch of an ordered package list with an order-preserving join.

use std::fmt;

use bytes::Bytes;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::config::BODY_SEPARATOR;
use crate::source::origin::ResourcePath;
use crate::source::traits::{FetchError, PackageSource};

/// Result of fetching a single package.
pub type FetchOutcome = Result<Bytes, FetchError>;

/// A failed fetch and its position in the requested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFailure {
    pub index: usize,
    pub error: FetchError,
}

/// One or more packages in a batch could not be retrieved.
///
/// Failures are kept in request order; the first one is the headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError {
    failures: Vec<IndexedFailure>,
}

impl AggregateError {
    pub fn failures(&self) -> &[IndexedFailure] {
        &self.failures
    }

    pub fn first(&self) -> &FetchError {
        &self.failures[0].error
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first())?;
        let others = self.failures.len() - 1;
        if others > 0 {
            write!(f, " (and {} more failed)", others)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// Fetch every path concurrently and join the bodies in request order.
///
/// All fetches run to completion before the result is decided. Any failure
/// fails the whole batch; no partial content is returned. Duplicates are
/// fetched once per occurrence.
pub async fn aggregate(
    source: &dyn PackageSource,
    paths: &[ResourcePath],
    bust_cache: bool,
) -> Result<String, AggregateError> {
    let mut pending: FuturesUnordered<_> = paths
        .iter()
        .enumerate()
        .map(|(index, path)| async move { (index, source.fetch(path, bust_cache).await) })
        .collect();

    let mut slots: Vec<Option<FetchOutcome>> = vec![None; paths.len()];
    while let Some((index, outcome)) = pending.next().await {
        debug!(
            "package {} settled index={} ok={}",
            paths[index],
            index,
            outcome.is_ok()
        );
        slots[index] = Some(outcome);
    }

    assemble(paths, slots)
}

fn assemble(
    paths: &[ResourcePath],
    slots: Vec<Option<FetchOutcome>>,
) -> Result<String, AggregateError> {
    let mut bodies = Vec::with_capacity(slots.len());
    let mut failures = Vec::new();

    for (index, slot) in slots.into_iter().enumerate() {
        let outcome = slot.unwrap_or_else(|| {
            Err(FetchError::Transport {
                path: paths[index].to_string(),
                reason: "fetch never settled".to_string(),
            })
        });
        match outcome.and_then(|body| decode(&paths[index], body)) {
            Ok(text) => bodies.push(text),
            Err(error) => failures.push(IndexedFailure { index, error }),
        }
    }

    if !failures.is_empty() {
        warn!(
            "package batch failed: {} of {} fetches failed",
            failures.len(),
            paths.len()
        );
        return Err(AggregateError { failures });
    }

    Ok(bodies.join(BODY_SEPARATOR))
}

fn decode(path: &ResourcePath, body: Bytes) -> Result<String, FetchError> {
    String::from_utf8(body.to_vec()).map_err(|_| FetchError::Decode {
        path: path.to_string(),
    })
}
