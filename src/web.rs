//! Read-only HTTP surface: the dashboard JSON API, probes and the static UI.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tracing::info;

use crate::models::DashboardSnapshot;
use crate::service::SnapshotReader;
use crate::types::DashboardError;

/// Presentation settings echoed back to the UI with every snapshot.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub title: String,
    pub subtitle: String,
    pub poll_interval: Duration,
}

#[derive(Clone)]
struct AppState {
    reader: Arc<dyn SnapshotReader>,
    page: Arc<PageSettings>,
}

#[derive(Serialize)]
struct DashboardResponse<'a> {
    #[serde(flatten)]
    snapshot: DashboardSnapshot,
    page_title: &'a str,
    page_subtitle: &'a str,
    poll_interval_ms: u64,
}

/// Builds the application router. Anything outside the API routes is served
/// from `web_dir`.
pub fn router(reader: Arc<dyn SnapshotReader>, page: PageSettings, web_dir: &Path) -> Router {
    let state = AppState {
        reader,
        page: Arc::new(page),
    };

    Router::new()
        .route(
            "/api/v1/dashboard",
            get(dashboard).fallback(method_not_allowed),
        )
        .route("/healthz", get(healthz).fallback(method_not_allowed))
        .route("/readyz", get(readyz).fallback(method_not_allowed))
        .fallback_service(ServeDir::new(web_dir))
        .with_state(state)
}

/// Serves `app` until `shutdown` flips to `true` or its sender goes away,
/// letting in-flight requests finish.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), DashboardError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            info!("Shutting down HTTP server");
        })
        .await?;
    Ok(())
}

async fn dashboard(State(state): State<AppState>) -> Response {
    let Some(snapshot) = state.reader.snapshot() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "snapshot unavailable" })),
        )
            .into_response();
    };

    let page = &state.page;
    let body = DashboardResponse {
        snapshot,
        page_title: &page.title,
        page_subtitle: &page.subtitle,
        poll_interval_ms: page.poll_interval.as_millis() as u64,
    };
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-store")],
        Json(body),
    )
        .into_response()
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.reader.ready();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "ready": ready })))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "method not allowed" })),
    )
}
