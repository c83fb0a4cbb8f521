// Web server — Axum front door for the moderation API.
//
// /api routes and /health serve JSON. When PUMICE_TEST_MODE is set, a small
// test page embedded at compile time via include_dir! is served for any
// other path, so the API can be poked from a browser without extra tooling.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use include_dir::{include_dir, Dir};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::profanity::store::TermList;
use crate::vision::traits::VisionAnalyzer;

pub mod handlers;

// Embedded browser test page, served only under PUMICE_TEST_MODE.
static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/public");

/// Request bodies carry base64 images — allow up to 10 MB.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub terms: Arc<TermList>,
    pub vision: Arc<dyn VisionAnalyzer>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    terms: Arc<TermList>,
    vision: Arc<dyn VisionAnalyzer>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState { terms, vision };
    let app = build_router(state, config.test_mode);

    let addr = format!("{bind}:{port}");
    info!("Pumice moderation API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState, serve_test_ui: bool) -> Router {
    let router = Router::new()
        .route("/api/moderate-image", post(handlers::moderate::moderate_image))
        .route("/health", get(health));

    let router = if serve_test_ui {
        router.fallback(serve_test_page)
    } else {
        router
    };

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Deployment health check — no core logic invoked.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Serve the embedded test page for non-API paths (test mode only).
async fn serve_test_page(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if let Some(file) = ASSETS.get_file(path) {
        return asset_response(file.contents(), path);
    }

    match ASSETS.get_file("index.html") {
        Some(index) => asset_response(index.contents(), "index.html"),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn asset_response(contents: &'static [u8], path: &str) -> Response {
    let mime = mime_type(path);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(mime))
        .body(Body::from(contents))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "css" => "text/css",
        "ico" => "image/x-icon",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
