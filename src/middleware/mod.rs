pub mod auth;
pub mod response;
pub mod validate_blog;
pub mod validate_query;

use std::collections::HashMap;

use crate::error::ApiError;

pub use auth::{basic_auth_middleware, AdminCredentials};
pub use response::{ApiResponse, ApiResult};
pub use validate_blog::BlogInput;
pub use validate_query::{validate_blogs_query, BlogsQueryParams, ValidBlogsQuery};

/// Pass `value` through when no field failed, otherwise report every failing field.
pub(crate) fn check_fields<T>(value: T, errors: HashMap<String, String>) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::validation_error("Invalid fields", Some(errors)))
    }
}
