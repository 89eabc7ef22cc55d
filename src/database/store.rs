use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{BlogChanges, BlogDocument};
use crate::filter::FilterData;

/// Document store holding the `blogs` collection.
///
/// `find` orders by `FilterData::order` and breaks remaining ties by
/// insertion order, so repeated identical queries return identical pages.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn find(&self, query: FilterData) -> Result<Vec<BlogDocument>, DatabaseError>;

    async fn count(&self, where_clause: Value) -> Result<u64, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogDocument>, DatabaseError>;

    async fn insert(&self, document: &BlogDocument) -> Result<(), DatabaseError>;

    /// Returns `false` when no document has this id.
    async fn update(&self, id: Uuid, changes: &BlogChanges) -> Result<bool, DatabaseError>;

    /// Returns `false` when no document has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn delete_all(&self) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}

pub type SharedBlogStore = Arc<dyn BlogStore>;
