//! HTTP handlers for the checkout API

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use checkout_form::{CheckoutPayload, SubmitResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

use crate::record::StoredRecord;
use crate::sink::RecordSink;

// ==================== App State ====================

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn RecordSink>,
}

// ==================== Types ====================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sink: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceholderQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

// ==================== Handlers ====================

/// GET /health - Health check
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sink: state.sink.name().to_string(),
    })
}

/// POST /api/save-form-data - Append one checkout record to the configured sink
async fn save_form_data(
    State(state): State<AppState>,
    body: Result<Json<CheckoutPayload>, JsonRejection>,
) -> (StatusCode, Json<SubmitResponse>) {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "malformed checkout submission");
            return (
                rejection.status(),
                Json(SubmitResponse {
                    success: false,
                    message: None,
                    error: Some(format!("Falha ao salvar dados: {}", rejection.body_text())),
                }),
            );
        }
    };
    info!(?payload, "checkout submission received");

    let record = StoredRecord::from_payload(&payload, chrono::Utc::now());
    match state.sink.append(&record).await {
        Ok(()) => {
            info!(record_id = %record.id, sink = state.sink.name(), "checkout saved");
            (
                StatusCode::OK,
                Json(SubmitResponse {
                    success: true,
                    message: Some("Dados salvos com sucesso".to_string()),
                    error: None,
                }),
            )
        }
        Err(e) => {
            error!(sink = state.sink.name(), error = %e, "failed to save checkout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse {
                    success: false,
                    message: None,
                    error: Some(format!("Falha ao salvar dados: {}", e)),
                }),
            )
        }
    }
}

/// GET /api/placeholder?width=&height= - Grey SVG with its own dimensions
async fn placeholder(Query(query): Query<PlaceholderQuery>) -> Response {
    let width = query.width.unwrap_or(100).clamp(1, 4096);
    let height = query.height.unwrap_or(100).clamp(1, 4096);
    let svg = format!(
        r##"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg"><rect width="100%" height="100%" fill="#CCCCCC"/><text x="50%" y="50%" font-family="Arial" font-size="14" fill="#666666" text-anchor="middle" dy=".3em">{w}x{h}</text></svg>"##,
        w = width,
        h = height
    );
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        svg,
    )
        .into_response()
}

// ==================== Router ====================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/save-form-data", post(save_form_data))
        .route("/api/placeholder", get(placeholder))
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
