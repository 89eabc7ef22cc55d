pub mod blog_query_service;
pub mod blog_service;

pub use blog_query_service::{BlogError, BlogQueryService};
pub use blog_service::BlogService;
