use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{BlogChanges, BlogDocument};
use crate::database::store::BlogStore;
use crate::filter::filter::validate_column;
use crate::filter::{FilterData, FilterError, FilterMatch};

/// In-process document collection. Documents are kept in insertion order.
#[derive(Default)]
pub struct MemoryBlogStore {
    documents: RwLock<Vec<BlogDocument>>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn window(field: &'static str, value: Option<i64>, default: usize) -> Result<usize, FilterError> {
        match value {
            None => Ok(default),
            Some(n) if n < 0 => Err(FilterError::InvalidWindow { field, value: n }),
            Some(n) => Ok(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn find(&self, query: FilterData) -> Result<Vec<BlogDocument>, DatabaseError> {
        for info in &query.order {
            validate_column(&info.column)?;
        }
        let where_clause = query.where_clause.unwrap_or_else(|| json!({}));
        let offset = Self::window("offset", query.offset, 0)?;
        let limit = Self::window("limit", query.limit, usize::MAX)?;

        let documents = self.documents.read().await;
        let mut matched: Vec<(Value, &BlogDocument)> = Vec::new();
        for document in documents.iter() {
            let value = serde_json::to_value(document)?;
            if FilterMatch::matches(&where_clause, &value)? {
                matched.push((value, document));
            }
        }
        FilterMatch::sort(&mut matched, &query.order, |entry| &entry.0);

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn count(&self, where_clause: Value) -> Result<u64, DatabaseError> {
        let documents = self.documents.read().await;
        let mut count = 0u64;
        for document in documents.iter() {
            if FilterMatch::matches(&where_clause, &serde_json::to_value(document)?)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogDocument>, DatabaseError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn insert(&self, document: &BlogDocument) -> Result<(), DatabaseError> {
        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| d.id == document.id) {
            return Err(DatabaseError::QueryError(format!("duplicate _id {}", document.id)));
        }
        documents.push(document.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: &BlogChanges) -> Result<bool, DatabaseError> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.id == id) {
            Some(document) => {
                document.apply(changes.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }

    async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let mut documents = self.documents.write().await;
        let removed = documents.len() as u64;
        documents.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
