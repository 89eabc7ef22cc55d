use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::BlogDocument;

/// Public wire format of a blog: `{ id, name, description, websiteUrl, createdAt, isMembership }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub website_url: String,
    #[serde(with = "crate::database::models::timestamp")]
    pub created_at: DateTime<Utc>,
    pub is_membership: bool,
}

impl From<BlogDocument> for BlogView {
    fn from(document: BlogDocument) -> Self {
        blog_to_view(document)
    }
}

/// Project a stored document onto its view; only `_id` is renamed.
pub fn blog_to_view(document: BlogDocument) -> BlogView {
    BlogView {
        id: document.id.to_string(),
        name: document.name,
        description: document.description,
        website_url: document.website_url,
        created_at: document.created_at,
        is_membership: document.is_membership,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::BlogChanges;
    use serde_json::json;

    #[test]
    fn maps_every_field() {
        let document = BlogDocument::new(BlogChanges {
            name: "Example".to_string(),
            description: "about".to_string(),
            website_url: "https://example.com".to_string(),
        });
        let view = blog_to_view(document.clone());

        assert_eq!(view.id, document.id.to_string());
        assert_eq!(view.name, document.name);
        assert_eq!(view.description, document.description);
        assert_eq!(view.website_url, document.website_url);
        assert_eq!(view.created_at, document.created_at);
        assert_eq!(view.is_membership, document.is_membership);
    }

    #[test]
    fn view_json_has_id_not_underscore_id() {
        let document = BlogDocument::new(BlogChanges {
            name: "n".to_string(),
            description: "d".to_string(),
            website_url: "https://n.io".to_string(),
        });
        let stored = serde_json::to_value(&document).unwrap();
        let value = serde_json::to_value(BlogView::from(document)).unwrap();

        assert!(value.get("_id").is_none());
        assert_eq!(value["id"], stored["_id"]);
        assert_eq!(value["createdAt"], stored["createdAt"]);
        assert_eq!(value["isMembership"], json!(false));
    }
}
