pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod filter_match;
pub mod pagination;
pub mod sanitize;
pub mod error;

pub use types::*;
pub use error::FilterError;
pub use filter::Filter;
pub use filter_match::FilterMatch;
pub use pagination::Paginator;
pub use sanitize::{sanitize, SanitizedBlogsQuery, ValidatedBlogsQuery};
