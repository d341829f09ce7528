// Fake package origins for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// Stand-in for a host that must never be contacted. Counts every hit.
pub async fn start_untrusted() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().fallback(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            "untrusted"
        }
    });
    (serve(app).await, hits)
}

async fn echo_cache_control(headers: HeaderMap) -> impl IntoResponse {
    headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string()
}

/// Fake package origin:
/// - `/a.js` -> "A", `/b.js` -> "B"
/// - `/slow-a.js` -> "A" after 150ms
/// - `/missing.js` -> 404, `/broken.js` -> 500
/// - `/cache-control.js` -> echoes the Cache-Control request header
/// - `/moved.js` -> redirect to `/b.js`
/// - `/escape.js` -> redirect to `escape_to`
pub async fn start_origin(escape_to: String) -> SocketAddr {
    let app = Router::new()
        .route("/a.js", get(|| async { "A" }))
        .route("/b.js", get(|| async { "B" }))
        .route(
            "/slow-a.js",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(150)).await;
                "A"
            }),
        )
        .route("/missing.js", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/broken.js",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/cache-control.js", get(echo_cache_control))
        .route("/moved.js", get(|| async { Redirect::temporary("/b.js") }))
        .route(
            "/escape.js",
            get(move || {
                let target = escape_to.clone();
                async move { Redirect::temporary(&target) }
            }),
        );
    serve(app).await
}

/// Fake origin whose `/loop/{n}` always redirects to `/loop/{n+1}`. Counts hits.
pub async fn start_redirect_loop() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/loop/{n}",
        get(move |Path(n): Path<u64>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Redirect::temporary(&format!("/loop/{}", n + 1))
            }
        }),
    );
    (serve(app).await, hits)
}
