use crate::fetch::ContentService;
use crate::types::Collection;
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: ContentService,
}

#[derive(Debug, Deserialize)]
pub struct DataParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "stay-content",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /data?type=rooms` and friends
async fn data(State(state): State<AppState>, Query(params): Query<DataParams>) -> Response {
    let Some(collection) = params.kind.as_deref().and_then(Collection::from_query_key) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": format!("Please specify a data type: {}", Collection::queryable_keys())
            })),
        )
            .into_response();
    };

    let data = state.service.fetch(collection).await;
    Json(json!({
        "message": format!("{} fetched successfully", collection.label()),
        "type": collection.key(),
        "count": data.len(),
        "data": data
    }))
    .into_response()
}

/// `GET /status`: aggregate connectivity report
async fn status(State(state): State<AppState>) -> Response {
    let report = state.service.check_connectivity().await;

    if report.success {
        Json(json!({
            "message": "CMS connectivity check completed",
            "success": true,
            "stats": report.stats,
            "data": report.summary(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
        .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": "CMS connectivity check failed",
                "success": false,
                "error": report.error
            })),
        )
            .into_response()
    }
}

/// `GET /rooms/:slug`
async fn room(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.service.room_by_slug(&slug).await {
        Some(room) => Json(room).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Room not found: {}", slug) })),
        )
            .into_response(),
    }
}

/// Build the read-only HTTP router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/data", get(data))
        .route("/status", get(status))
        .route("/rooms/:slug", get(room))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(service: ContentService, bind_addr: &str) -> anyhow::Result<()> {
    let app = app_router(AppState { service });
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!(%bind_addr, "HTTP server listening");
    info!("Data:   http://{}/data?type=rooms", bind_addr);
    info!("Status: http://{}/status", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
