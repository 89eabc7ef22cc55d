use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Blogs API",
        "version": version,
        "description": "Blogs CRUD with search, sort and pagination",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "list": "GET /blogs?searchNameTerm&sortBy&sortDirection&pageNumber&pageSize (public)",
            "read": "GET /blogs/:id (public)",
            "write": "POST /blogs, PUT /blogs/:id, DELETE /blogs/:id (basic auth)",
            "testing": "DELETE /testing/all-data (basic auth, when enabled)",
        }
    }))
}

/// GET /health - Store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": backend
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, backend, "health check failed");
            ApiError::service_unavailable(format!("{} store unavailable", backend)).into_response()
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
