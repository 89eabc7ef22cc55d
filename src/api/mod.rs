pub mod format;

pub use format::{blog_to_view, BlogView};
