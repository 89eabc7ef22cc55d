use tracing::info;

use crate::api::format::{blog_to_view, BlogView};
use crate::database::models::{BlogChanges, BlogDocument};
use crate::database::store::SharedBlogStore;

use super::blog_query_service::{parse_blog_id, BlogError};

/// Write side of the blogs collection. Inputs arrive already validated.
#[derive(Clone)]
pub struct BlogService {
    store: SharedBlogStore,
}

impl BlogService {
    pub fn new(store: SharedBlogStore) -> Self {
        Self { store }
    }

    pub async fn create_blog(&self, changes: BlogChanges) -> Result<BlogView, BlogError> {
        let document = BlogDocument::new(changes);
        self.store.insert(&document).await?;
        info!(id = %document.id, "created blog");
        Ok(blog_to_view(document))
    }

    pub async fn update_blog(&self, id: &str, changes: BlogChanges) -> Result<(), BlogError> {
        let id = parse_blog_id(id)?;
        if !self.store.update(id, &changes).await? {
            return Err(BlogError::NotFound);
        }
        info!(%id, "updated blog");
        Ok(())
    }

    pub async fn delete_blog(&self, id: &str) -> Result<(), BlogError> {
        let id = parse_blog_id(id)?;
        if !self.store.delete(id).await? {
            return Err(BlogError::NotFound);
        }
        info!(%id, "deleted blog");
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64, BlogError> {
        let removed = self.store.delete_all().await?;
        info!(removed, "cleared blogs collection");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::database::memory::MemoryBlogStore;
    use crate::database::store::BlogStore;
    use crate::services::BlogQueryService;

    fn changes(name: &str, url: &str) -> BlogChanges {
        BlogChanges {
            name: name.to_string(),
            description: format!("{} description", name),
            website_url: url.to_string(),
        }
    }

    fn services() -> (BlogService, BlogQueryService, Arc<MemoryBlogStore>) {
        let store = Arc::new(MemoryBlogStore::new());
        (
            BlogService::new(store.clone()),
            BlogQueryService::new(store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn create_returns_stored_view() {
        let (service, queries, _) = services();
        let created = service.create_blog(changes("name1", "https://it.com")).await.unwrap();

        assert_eq!(created.name, "name1");
        assert_eq!(created.website_url, "https://it.com");
        assert!(!created.is_membership);
        assert_eq!(queries.find_blog(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_replaces_only_mutable_fields() {
        let (service, queries, _) = services();
        let created = service.create_blog(changes("name1", "https://it.com")).await.unwrap();

        service
            .update_blog(&created.id, changes("newName", "https://it.by"))
            .await
            .unwrap();

        let updated = queries.find_blog(&created.id).await.unwrap();
        assert_eq!(updated.name, "newName");
        assert_eq!(updated.description, "newName description");
        assert_eq!(updated.website_url, "https://it.by");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.is_membership, created.is_membership);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found_and_change_nothing() {
        let (service, _, store) = services();
        service.create_blog(changes("keep", "https://keep.com")).await.unwrap();
        let missing = Uuid::now_v7().to_string();

        assert!(matches!(
            service.update_blog(&missing, changes("x", "https://x.com")).await,
            Err(BlogError::NotFound)
        ));
        assert!(matches!(service.delete_blog(&missing).await, Err(BlogError::NotFound)));
        assert!(matches!(service.delete_blog("garbage").await, Err(BlogError::NotFound)));
        assert_eq!(store.count(serde_json::json!({})).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let (service, _, store) = services();
        let first = service.create_blog(changes("first", "https://a.com")).await.unwrap();
        service.create_blog(changes("second", "https://b.com")).await.unwrap();

        service.delete_blog(&first.id).await.unwrap();
        assert_eq!(store.count(serde_json::json!({})).await.unwrap(), 1);
        assert!(matches!(service.delete_blog(&first.id).await, Err(BlogError::NotFound)));

        assert_eq!(service.delete_all().await.unwrap(), 1);
    }
}
