use serde::{Deserialize, Serialize};

/// One page of results plus the metadata needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginator<T> {
    pub pages_count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> Paginator<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: u64, page_size: u64) -> Self {
        Self {
            pages_count: pages_count(total_count, page_size),
            page,
            page_size,
            total_count,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginator<U> {
        Paginator {
            pages_count: self.pages_count,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// `ceil(total / page_size)`; zero pages for an empty result.
pub fn pages_count(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Records to skip before `page` (1-based).
pub fn skip_for(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(page_size)
}
