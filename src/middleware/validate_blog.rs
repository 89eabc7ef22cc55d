use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::database::models::BlogChanges;
use crate::error::ApiError;

use super::check_fields;

pub const NAME_MAX_LEN: usize = 15;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const WEBSITE_URL_MAX_LEN: usize = 100;

/// Blog body for create and update, before validation.
///
/// Every field is optional here so a missing field is reported alongside
/// the others instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
}

impl BlogInput {
    pub fn validate(self) -> Result<BlogChanges, ApiError> {
        let mut errors = HashMap::new();

        let name = required_text("name", self.name, NAME_MAX_LEN, &mut errors);
        let description = required_text("description", self.description, DESCRIPTION_MAX_LEN, &mut errors);
        let website_url = required_text("websiteUrl", self.website_url, WEBSITE_URL_MAX_LEN, &mut errors)
            .and_then(|url| {
                if is_valid_website_url(&url) {
                    Some(url)
                } else {
                    errors.insert(
                        "websiteUrl".to_string(),
                        "Field should be an https URL like https://example.com/path".to_string(),
                    );
                    None
                }
            });

        let changes = match (name, description, website_url) {
            (Some(name), Some(description), Some(website_url)) => Some(BlogChanges {
                name,
                description,
                website_url,
            }),
            _ => None,
        };

        check_fields(changes, errors)?
            .ok_or_else(|| ApiError::validation_error("Invalid blog input", None))
    }
}

fn required_text(
    field: &str,
    raw: Option<String>,
    max_len: usize,
    errors: &mut HashMap<String, String>,
) -> Option<String> {
    let Some(raw) = raw else {
        errors.insert(field.to_string(), "Field is required".to_string());
        return None;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(field.to_string(), "Field shouldn't be empty".to_string());
        return None;
    }
    if trimmed.chars().count() > max_len {
        errors.insert(field.to_string(), format!("Field should be at most {} characters", max_len));
        return None;
    }
    Some(trimmed.to_string())
}

/// `https://` followed by a dotted host and optional `/segment` path,
/// where labels and segments use letters, digits, `_` or `-`.
pub fn is_valid_website_url(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("https://") else {
        return false;
    };

    let (host, path) = match rest.find('/') {
        Some(index) => rest.split_at(index),
        None => (rest, ""),
    };

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_word(label)) {
        return false;
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    if !path.split('/').skip(1).all(is_word) {
        return false;
    }

    Url::parse(value).is_ok()
}

fn is_word(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
