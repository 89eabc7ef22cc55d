use axum::extract::{rejection::JsonRejection, Json, Path, State};

use crate::api::format::BlogView;
use crate::middleware::{ApiResponse, ApiResult, BlogInput};
use crate::AppState;

/// GET /blogs/:id - Get a single blog by id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<BlogView> {
    let blog = state.queries.find_blog(&id).await?;
    Ok(ApiResponse::success(blog))
}

/// PUT /blogs/:id - Replace name, description and websiteUrl
///
/// The body is validated before the id is looked up, so an invalid body
/// for a missing blog answers 400.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<BlogInput>, JsonRejection>,
) -> ApiResult<()> {
    let Json(input) = body?;
    let changes = input.validate()?;
    state.blogs.update_blog(&id, changes).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /blogs/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.blogs.delete_blog(&id).await?;
    Ok(ApiResponse::no_content())
}
