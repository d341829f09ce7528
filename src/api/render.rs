use std::time::Instant;

use tracing::{debug, warn};

use super::types::{ErrorDetail, RenderRequest, RenderResponse};
use crate::engine::pipeline::aggregate;
use crate::source::traits::PackageSource;

/// Fetch the request's packages and shape the outcome into a response.
///
/// Fetch failures come back as [`RenderResponse::Error`], never as a fault.
/// `path` and `props` are for the renderer and are not inspected here.
pub async fn handle(source: &dyn PackageSource, request: RenderRequest) -> RenderResponse {
    let t0 = Instant::now();
    debug!(
        "render request path={} files={} props={}",
        request.path,
        request.files.len(),
        request.props.len()
    );

    match aggregate(source, &request.files, false).await {
        Ok(contents) => {
            debug!(
                "render request path={} assembled bytes={} elapsed_ms={}",
                request.path,
                contents.len(),
                t0.elapsed().as_millis()
            );
            RenderResponse::Contents { contents }
        }
        Err(e) => {
            warn!("render request path={} failed: {}", request.path, e);
            RenderResponse::Error {
                error: ErrorDetail::from(&e),
            }
        }
    }
}
