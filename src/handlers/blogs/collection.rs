use axum::extract::{rejection::JsonRejection, Json, State};

use crate::api::format::BlogView;
use crate::filter::{sanitize, Paginator};
use crate::middleware::{ApiResponse, ApiResult, BlogInput, ValidBlogsQuery};
use crate::AppState;

/// GET /blogs - One page of blogs, optionally filtered by name
pub async fn get(
    State(state): State<AppState>,
    ValidBlogsQuery(query): ValidBlogsQuery,
) -> ApiResult<Paginator<BlogView>> {
    let query = sanitize(query);
    let page = state.queries.find_blogs(&query).await?;
    Ok(ApiResponse::success(page))
}

/// POST /blogs - Create a blog
pub async fn post(
    State(state): State<AppState>,
    body: Result<Json<BlogInput>, JsonRejection>,
) -> ApiResult<BlogView> {
    let Json(input) = body?;
    let changes = input.validate()?;
    let created = state.blogs.create_blog(changes).await?;
    Ok(ApiResponse::created(created))
}
