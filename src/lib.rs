pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig, StoreBackend, StoreConfig};
use crate::database::{DatabaseError, MemoryBlogStore, PgBlogStore, SharedBlogStore};
use crate::middleware::{basic_auth_middleware, AdminCredentials};
use crate::services::{BlogQueryService, BlogService};

/// Shared handler state: both services over one store.
#[derive(Clone)]
pub struct AppState {
    pub queries: BlogQueryService,
    pub blogs: BlogService,
    pub store: SharedBlogStore,
}

impl AppState {
    pub fn new(store: SharedBlogStore) -> Self {
        Self {
            queries: BlogQueryService::new(store.clone()),
            blogs: BlogService::new(store.clone()),
            store,
        }
    }
}

/// Open the store selected by `STORE_BACKEND`.
pub async fn build_store(config: &StoreConfig) -> Result<SharedBlogStore, DatabaseError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryBlogStore::new())),
        StoreBackend::Postgres => Ok(Arc::new(PgBlogStore::connect(config).await?)),
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let credentials = AdminCredentials::from(&config.security);

    let public = Router::new()
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .route("/blogs", get(handlers::blogs::collection_get))
        .route("/blogs/:id", get(handlers::blogs::record_get));

    let mut protected = Router::new()
        .route("/blogs", post(handlers::blogs::collection_post))
        .route(
            "/blogs/:id",
            axum::routing::put(handlers::blogs::record_put).delete(handlers::blogs::record_delete),
        );
    if config.api.enable_testing_routes {
        protected = protected.route("/testing/all-data", delete(handlers::testing::delete_all));
    }
    let protected = protected.route_layer(from_fn_with_state(credentials, basic_auth_middleware));

    let mut router = public
        .merge(protected)
        .fallback(handlers::root::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
