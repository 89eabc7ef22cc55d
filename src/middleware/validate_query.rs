use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::database::models::BlogSortField;
use crate::error::ApiError;
use crate::filter::sanitize::{QueryParamRule, PAGE_NUMBER, PAGE_SIZE, SEARCH_NAME_TERM, SORT_BY, SORT_DIRECTION};
use crate::filter::{SortDirection, ValidatedBlogsQuery};

use super::check_fields;

/// Listing query exactly as received
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogsQueryParams {
    pub search_name_term: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

/// Extractor that rejects malformed listing parameters with 400
#[derive(Debug, Clone)]
pub struct ValidBlogsQuery(pub ValidatedBlogsQuery);

#[async_trait]
impl<S> FromRequestParts<S> for ValidBlogsQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<BlogsQueryParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        validate_blogs_query(params).map(ValidBlogsQuery)
    }
}

pub fn validate_blogs_query(params: BlogsQueryParams) -> Result<ValidatedBlogsQuery, ApiError> {
    let mut errors = HashMap::new();

    let search_name_term = text_param(&SEARCH_NAME_TERM, params.search_name_term, &mut errors);

    let sort_by = text_param(&SORT_BY, params.sort_by, &mut errors).and_then(|raw| {
        let field = BlogSortField::from_param(&raw);
        if field.is_none() {
            let allowed: Vec<&str> = BlogSortField::ALL
                .iter()
                .map(|f| if *f == BlogSortField::Id { "id" } else { f.column() })
                .collect();
            errors.insert(SORT_BY.name.to_string(), format!("Field should be one of: {}", allowed.join(", ")));
        }
        field
    });

    let sort_direction = text_param(&SORT_DIRECTION, params.sort_direction, &mut errors).and_then(|raw| {
        let direction = SortDirection::parse(&raw);
        if direction.is_none() {
            errors.insert(SORT_DIRECTION.name.to_string(), "Field should be \"asc\" or \"desc\"".to_string());
        }
        direction
    });

    let page_number = integer_param(&PAGE_NUMBER, params.page_number, &mut errors);
    let page_size = integer_param(&PAGE_SIZE, params.page_size, &mut errors);

    check_fields(
        ValidatedBlogsQuery {
            search_name_term,
            sort_by,
            sort_direction,
            page_number,
            page_size,
        },
        errors,
    )
}

/// Trimmed, non-empty and within the rule's length; absent stays absent.
fn text_param(rule: &QueryParamRule, raw: Option<String>, errors: &mut HashMap<String, String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(rule.name.to_string(), "Field shouldn't be empty".to_string());
        return None;
    }
    if trimmed.chars().count() > rule.max_len {
        errors.insert(rule.name.to_string(), format!("Field should be at most {} characters", rule.max_len));
        return None;
    }
    Some(trimmed.to_string())
}

fn integer_param(rule: &QueryParamRule, raw: Option<String>, errors: &mut HashMap<String, String>) -> Option<i64> {
    let text = text_param(rule, raw, errors)?;
    match text.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.insert(rule.name.to_string(), "Field should be number".to_string());
            None
        }
    }
}
