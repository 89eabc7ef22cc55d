use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Collection (table) holding blog documents.
pub const BLOGS_COLLECTION: &str = "blogs";

/// A blog as persisted in the `blogs` collection.
///
/// Field names on the wire and in storage are the document names
/// (`_id`, `websiteUrl`, `createdAt`, `isMembership`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BlogDocument {
    #[serde(rename = "_id")]
    #[sqlx(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "websiteUrl")]
    #[sqlx(rename = "websiteUrl")]
    pub website_url: String,
    #[serde(rename = "createdAt", with = "super::timestamp")]
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "isMembership")]
    #[sqlx(rename = "isMembership")]
    pub is_membership: bool,
}

impl BlogDocument {
    /// New document with a time-ordered id, `createdAt` truncated to milliseconds.
    pub fn new(changes: BlogChanges) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: changes.name,
            description: changes.description,
            website_url: changes.website_url,
            created_at: Utc::now().trunc_subsecs(3),
            is_membership: false,
        }
    }

    pub fn apply(&mut self, changes: BlogChanges) {
        self.name = changes.name;
        self.description = changes.description;
        self.website_url = changes.website_url;
    }
}

/// The replaceable fields of a blog, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogChanges {
    pub name: String,
    pub description: String,
    pub website_url: String,
}

/// Fields a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSortField {
    Id,
    Name,
    Description,
    WebsiteUrl,
    #[default]
    CreatedAt,
    IsMembership,
}

impl BlogSortField {
    pub const ALL: [BlogSortField; 6] = [
        BlogSortField::Id,
        BlogSortField::Name,
        BlogSortField::Description,
        BlogSortField::WebsiteUrl,
        BlogSortField::CreatedAt,
        BlogSortField::IsMembership,
    ];

    /// Accepts the external view name (`id`) as well as document names.
    pub fn from_param(value: &str) -> Option<Self> {
        Some(match value {
            "id" | "_id" => BlogSortField::Id,
            "name" => BlogSortField::Name,
            "description" => BlogSortField::Description,
            "websiteUrl" => BlogSortField::WebsiteUrl,
            "createdAt" => BlogSortField::CreatedAt,
            "isMembership" => BlogSortField::IsMembership,
            _ => return None,
        })
    }

    /// Text fields, ordered by their string value.
    pub fn is_text(&self) -> bool {
        matches!(self, BlogSortField::Name | BlogSortField::Description | BlogSortField::WebsiteUrl)
    }

    /// Document field (and table column) name.
    pub fn column(&self) -> &'static str {
        match self {
            BlogSortField::Id => "_id",
            BlogSortField::Name => "name",
            BlogSortField::Description => "description",
            BlogSortField::WebsiteUrl => "websiteUrl",
            BlogSortField::CreatedAt => "createdAt",
            BlogSortField::IsMembership => "isMembership",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn changes() -> BlogChanges {
        BlogChanges {
            name: "name1".to_string(),
            description: "description1".to_string(),
            website_url: "https://it.com".to_string(),
        }
    }

    #[test]
    fn new_document_defaults() {
        let doc = BlogDocument::new(changes());
        assert!(!doc.is_membership);
        assert_eq!(doc.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(doc.id.get_version_num(), 7);
    }

    #[test]
    fn serializes_with_document_field_names() {
        let doc = BlogDocument::new(changes());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_id"], json!(doc.id.to_string()));
        assert_eq!(value["websiteUrl"], json!("https://it.com"));
        assert_eq!(value["isMembership"], json!(false));
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));

        let back: BlogDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn apply_keeps_identity() {
        let mut doc = BlogDocument::new(changes());
        let (id, created_at) = (doc.id, doc.created_at);
        doc.apply(BlogChanges {
            name: "newName".to_string(),
            description: "newDescription".to_string(),
            website_url: "https://it.by".to_string(),
        });
        assert_eq!(doc.id, id);
        assert_eq!(doc.created_at, created_at);
        assert_eq!(doc.name, "newName");
    }

    #[test]
    fn sort_fields_round_trip_through_params() {
        for field in BlogSortField::ALL {
            assert_eq!(BlogSortField::from_param(field.column()), Some(field));
        }
        assert_eq!(BlogSortField::from_param("id"), Some(BlogSortField::Id));
        assert_eq!(BlogSortField::from_param("created_at"), None);
    }
}
