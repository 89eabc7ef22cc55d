use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// DELETE /testing/all-data - Empty the blogs collection
pub async fn delete_all(State(state): State<AppState>) -> ApiResult<()> {
    let removed = state.blogs.delete_all().await?;
    tracing::warn!(removed, "testing route cleared all blogs");
    Ok(ApiResponse::no_content())
}
