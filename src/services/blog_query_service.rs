use uuid::Uuid;

use crate::api::format::{blog_to_view, BlogView};
use crate::database::manager::DatabaseError;
use crate::database::store::SharedBlogStore;
use crate::filter::{Paginator, SanitizedBlogsQuery};

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("Blog not found")]
    NotFound,
    #[error("Store query failed: {0}")]
    StoreQueryFailure(#[from] DatabaseError),
}

/// Parse an external id; anything that is not a UUID cannot exist.
pub fn parse_blog_id(id: &str) -> Result<Uuid, BlogError> {
    Uuid::parse_str(id).map_err(|_| BlogError::NotFound)
}

/// Read side of the blogs collection.
#[derive(Clone)]
pub struct BlogQueryService {
    store: SharedBlogStore,
}

impl BlogQueryService {
    pub fn new(store: SharedBlogStore) -> Self {
        Self { store }
    }

    /// One page of blogs matching the sanitized query.
    pub async fn find_blogs(&self, query: &SanitizedBlogsQuery) -> Result<Paginator<BlogView>, BlogError> {
        let filter_data = query.to_filter_data();
        let where_clause = query.filter();

        tracing::debug!(
            search = ?query.search_name_term,
            sort_by = query.sort_by.column(),
            sort_direction = ?query.sort_direction,
            page = query.page_number,
            page_size = query.page_size,
            "listing blogs"
        );

        let (documents, total_count) = futures::try_join!(
            self.store.find(filter_data),
            self.store.count(where_clause),
        )
        .map_err(|e| {
            tracing::error!(error = %e, backend = self.store.backend(), "blog listing failed");
            BlogError::StoreQueryFailure(e)
        })?;

        Ok(Paginator::new(documents, total_count, query.page_number, query.page_size).map(blog_to_view))
    }

    pub async fn find_blog(&self, id: &str) -> Result<BlogView, BlogError> {
        let id = parse_blog_id(id)?;
        match self.store.find_by_id(id).await? {
            Some(document) => Ok(blog_to_view(document)),
            None => Err(BlogError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::database::memory::MemoryBlogStore;
    use crate::database::models::{BlogChanges, BlogDocument, BlogSortField};
    use crate::database::store::BlogStore;
    use crate::filter::{sanitize, FilterData, SortDirection, ValidatedBlogsQuery};

    async fn service_with(names: &[&str]) -> BlogQueryService {
        let store = MemoryBlogStore::new();
        for name in names {
            store
                .insert(&BlogDocument::new(BlogChanges {
                    name: name.to_string(),
                    description: "description".to_string(),
                    website_url: "https://it.com".to_string(),
                }))
                .await
                .unwrap();
        }
        BlogQueryService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn empty_collection_has_zero_pages() {
        let service = service_with(&[]).await;
        let page = service.find_blogs(&SanitizedBlogsQuery::default()).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!((page.total_count, page.pages_count), (0, 0));
        assert_eq!((page.page, page.page_size), (1, 10));
    }

    #[tokio::test]
    async fn pages_never_exceed_page_size() {
        let names: Vec<String> = (0..7).map(|i| format!("blog{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let service = service_with(&refs).await;

        for page_size in 1..=8 {
            for page_number in 1..=8 {
                let query = sanitize(ValidatedBlogsQuery {
                    page_number: Some(page_number),
                    page_size: Some(page_size),
                    ..Default::default()
                });
                let page = service.find_blogs(&query).await.unwrap();
                assert!(page.items.len() as u64 <= page.page_size);
                assert_eq!(page.total_count, 7);
                assert_eq!(page.pages_count, 7u64.div_ceil(page_size as u64));
            }
        }
    }

    #[tokio::test]
    async fn searches_and_sorts() {
        let service = service_with(&["Example", "other", "EXAMINER", "sample"]).await;
        let query = sanitize(ValidatedBlogsQuery {
            search_name_term: Some("exam".to_string()),
            sort_by: Some(BlogSortField::Name),
            sort_direction: Some(SortDirection::Asc),
            ..Default::default()
        });
        let page = service.find_blogs(&query).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["EXAMINER", "Example"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn default_order_is_newest_first() {
        let service = service_with(&["first", "second", "third"]).await;
        let page = service.find_blogs(&SanitizedBlogsQuery::default()).await.unwrap();
        let created: Vec<_> = page.items.iter().map(|b| b.created_at).collect();
        let mut sorted = created.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(created, sorted);
    }

    #[tokio::test]
    async fn lookup_treats_malformed_and_missing_ids_as_not_found() {
        let service = service_with(&["one"]).await;
        assert!(matches!(service.find_blog("not-an-id").await, Err(BlogError::NotFound)));
        assert!(matches!(
            service.find_blog(&Uuid::now_v7().to_string()).await,
            Err(BlogError::NotFound)
        ));

        let listed = service.find_blogs(&SanitizedBlogsQuery::default()).await.unwrap();
        let found = service.find_blog(&listed.items[0].id).await.unwrap();
        assert_eq!(found, listed.items[0]);
    }

    struct BrokenStore;

    #[async_trait]
    impl BlogStore for BrokenStore {
        async fn find(&self, _query: FilterData) -> Result<Vec<BlogDocument>, DatabaseError> {
            Err(DatabaseError::QueryError("connection reset".to_string()))
        }
        async fn count(&self, _where_clause: Value) -> Result<u64, DatabaseError> {
            Ok(0)
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<BlogDocument>, DatabaseError> {
            Err(DatabaseError::QueryError("connection reset".to_string()))
        }
        async fn insert(&self, _document: &BlogDocument) -> Result<(), DatabaseError> {
            Ok(())
        }
        async fn update(&self, _id: Uuid, _changes: &BlogChanges) -> Result<bool, DatabaseError> {
            Ok(false)
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, DatabaseError> {
            Ok(false)
        }
        async fn delete_all(&self) -> Result<u64, DatabaseError> {
            Ok(0)
        }
        async fn ping(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn store_errors_surface_as_query_failures() {
        let service = BlogQueryService::new(Arc::new(BrokenStore));
        assert!(matches!(
            service.find_blogs(&SanitizedBlogsQuery::default()).await,
            Err(BlogError::StoreQueryFailure(_))
        ));
        assert!(matches!(
            service.find_blog(&Uuid::now_v7().to_string()).await,
            Err(BlogError::StoreQueryFailure(_))
        ));
    }
}
