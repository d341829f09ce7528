// Axum request handlers that turn render requests into package fetches.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::render::handle;
use crate::api::types::{ErrorDetail, ErrorKind, RenderRequest, RenderResponse};
use crate::config::PING_RESPONSE;
use crate::source::traits::PackageSource;

pub type SharedSource = Arc<dyn PackageSource>;

pub struct RenderServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl RenderServer {
    /// Bind `addr` and start serving in the background.
    pub async fn start(addr: SocketAddr, source: SharedSource) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(source);

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                error!("render server stopped with error: {}", e);
            }
        });

        info!("render server listening on {}", addr);
        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    /// Build a URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("render server task ended abnormally: {}", e);
        }
        info!("render server on {} stopped", self.addr);
    }
}

pub fn router(source: SharedSource) -> Router {
    Router::new()
        .route("/render", post(render_handler))
        .route("/_api/ping", get(ping_handler))
        .with_state(source)
}

/// HTTP status for a render response.
fn status_for(resp: &RenderResponse) -> StatusCode {
    match resp {
        RenderResponse::Contents { .. } => StatusCode::OK,
        RenderResponse::Error { error } => match error.kind {
            ErrorKind::Fetch => StatusCode::BAD_GATEWAY,
            ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
        },
    }
}

/// POST /render — fetch the listed packages and return their contents.
async fn render_handler(
    State(source): State<SharedSource>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Response {
    let resp = match payload {
        Ok(Json(request)) => handle(source.as_ref(), request).await,
        Err(rejection) => {
            debug!("rejected render request: {}", rejection.body_text());
            RenderResponse::Error {
                error: ErrorDetail::malformed(rejection.body_text()),
            }
        }
    };
    (status_for(&resp), Json(resp)).into_response()
}

/// GET /_api/ping — liveness probe.
async fn ping_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        PING_RESPONSE,
    )
}
