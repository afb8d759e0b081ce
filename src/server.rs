//! HTTP front end for the search service.
//!
//! Provides [`router`] (used directly by tests) and [`serve`], which builds the
//! catalog index from config and runs the server until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::catalog::CatalogItem;
use crate::config::AppConfig;
use crate::error::SearchError;
use crate::search::{SearchQuery, SearchService};

/// Body of `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub k: Option<i64>,
}

/// Error body: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let status = match &err {
            SearchError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            SearchError::Provider(_) => StatusCode::BAD_GATEWAY,
            SearchError::DimensionMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "search failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Build the router: `POST /search`, `GET /health`, with CORS applied.
pub fn router(service: Arc<SearchService>, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/search", post(handle_search))
        .route("/health", get(handle_health))
        .layer(cors_layer(cors_allowed_origins))
        .with_state(service)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn handle_search(
    State(service): State<Arc<SearchService>>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let text = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter is required"))?;

    let query = SearchQuery { text, k: request.k };
    let items = service.search(&query).await?;
    Ok(Json(items.into_iter().cloned().collect()))
}

async fn handle_health(State(service): State<Arc<SearchService>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "items": service.len(),
        "dimensions": service.dimensions(),
    }))
}

/// Load the catalog, index it, and serve HTTP until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<()> {
    let service = crate::build_service(&config).await?;
    let app = router(Arc::new(service), &config.server.cors_allowed_origins);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "search endpoint listening at http://{bind_addr}/search");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down search server");
        })
        .await?;

    Ok(())
}
