use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{BlogChanges, BlogDocument, BlogSortField, BLOGS_COLLECTION};
use crate::database::repository::Repository;
use crate::database::store::BlogStore;
use crate::filter::{FilterData, FilterOrderInfo, SortDirection};

/// Insertion-order column appended to every ORDER BY.
const NATURAL_ORDER_COLUMN: &str = "_seq";

/// Byte-order collation, so text sorts the same as the in-memory store
/// whatever locale the database was created with.
const BINARY_COLLATION: &str = "C";

fn store_order(mut order: Vec<FilterOrderInfo>) -> Vec<FilterOrderInfo> {
    for info in &mut order {
        if BlogSortField::from_param(&info.column).is_some_and(|field| field.is_text()) {
            info.collation = Some(BINARY_COLLATION.to_string());
        }
    }
    order.push(FilterOrderInfo::new(NATURAL_ORDER_COLUMN, SortDirection::Asc));
    order
}

pub struct PgBlogStore {
    repository: Repository<BlogDocument>,
}

impl PgBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: Repository::new(BLOGS_COLLECTION, pool),
        }
    }

    pub async fn connect(config: &StoreConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(config).await?;
        DatabaseManager::ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn find(&self, mut query: FilterData) -> Result<Vec<BlogDocument>, DatabaseError> {
        query.order = store_order(query.order);
        self.repository.select_any(query).await
    }

    async fn count(&self, where_clause: Value) -> Result<u64, DatabaseError> {
        let count = self
            .repository
            .count(FilterData {
                where_clause: Some(where_clause),
                ..Default::default()
            })
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogDocument>, DatabaseError> {
        self.repository.select_id(id).await
    }

    async fn insert(&self, document: &BlogDocument) -> Result<(), DatabaseError> {
        let sql = format!(
            r#"INSERT INTO "{}" ("_id", "name", "description", "websiteUrl", "createdAt", "isMembership")
               VALUES ($1, $2, $3, $4, $5, $6)"#,
            self.repository.table_name()
        );
        sqlx::query(&sql)
            .bind(document.id)
            .bind(&document.name)
            .bind(&document.description)
            .bind(&document.website_url)
            .bind(document.created_at)
            .bind(document.is_membership)
            .execute(self.repository.pool())
            .await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: &BlogChanges) -> Result<bool, DatabaseError> {
        let sql = format!(
            r#"UPDATE "{}" SET "name" = $2, "description" = $3, "websiteUrl" = $4 WHERE "_id" = $1"#,
            self.repository.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.website_url)
            .execute(self.repository.pool())
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repository.delete_id(id).await
    }

    async fn delete_all(&self) -> Result<u64, DatabaseError> {
        self.repository.delete_all().await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(self.repository.pool()).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
