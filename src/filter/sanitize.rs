use serde_json::{json, Value};

use super::filter_where::escape_like_pattern;
use super::pagination::skip_for;
use super::types::{FilterData, FilterOrderInfo, SortDirection};
use crate::database::models::BlogSortField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Absent,
    Text(&'static str),
    Integer(i64),
}

/// Bounds and default for one listing query parameter.
///
/// `max_len` is enforced by the validation gate on the raw text; `default` and
/// `range` are applied by [`sanitize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParamRule {
    pub name: &'static str,
    pub max_len: usize,
    pub default: ParamDefault,
    pub range: Option<(i64, i64)>,
}

pub const SEARCH_NAME_TERM: QueryParamRule = QueryParamRule {
    name: "searchNameTerm",
    max_len: 15,
    default: ParamDefault::Absent,
    range: None,
};

pub const SORT_BY: QueryParamRule = QueryParamRule {
    name: "sortBy",
    max_len: 100,
    default: ParamDefault::Text("createdAt"),
    range: None,
};

pub const SORT_DIRECTION: QueryParamRule = QueryParamRule {
    name: "sortDirection",
    max_len: 4,
    default: ParamDefault::Text("desc"),
    range: None,
};

pub const PAGE_NUMBER: QueryParamRule = QueryParamRule {
    name: "pageNumber",
    max_len: 15,
    default: ParamDefault::Integer(1),
    range: Some((1, i64::MAX)),
};

pub const PAGE_SIZE: QueryParamRule = QueryParamRule {
    name: "pageSize",
    max_len: 15,
    default: ParamDefault::Integer(10),
    range: Some((1, 100)),
};

pub const BLOGS_QUERY_RULES: [QueryParamRule; 5] =
    [SEARCH_NAME_TERM, SORT_BY, SORT_DIRECTION, PAGE_NUMBER, PAGE_SIZE];

impl QueryParamRule {
    pub fn text_default(&self) -> Option<&'static str> {
        match self.default {
            ParamDefault::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Fill a missing integer from the default, then clamp into `range`.
    pub fn integer_or_default(&self, value: Option<i64>) -> i64 {
        let fallback = match self.default {
            ParamDefault::Integer(default) => default,
            _ => self.range.map_or(0, |(min, _)| min),
        };
        let value = value.unwrap_or(fallback);
        match self.range {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }
}

/// Listing parameters that passed the validation gate, each still optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedBlogsQuery {
    pub search_name_term: Option<String>,
    pub sort_by: Option<BlogSortField>,
    pub sort_direction: Option<SortDirection>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Fully defaulted listing parameters. `search_name_term: None` means no search.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedBlogsQuery {
    pub search_name_term: Option<String>,
    pub sort_by: BlogSortField,
    pub sort_direction: SortDirection,
    pub page_number: u64,
    pub page_size: u64,
}

impl Default for SanitizedBlogsQuery {
    fn default() -> Self {
        sanitize(ValidatedBlogsQuery::default())
    }
}

pub fn sanitize(query: ValidatedBlogsQuery) -> SanitizedBlogsQuery {
    let sort_by = query
        .sort_by
        .or_else(|| SORT_BY.text_default().and_then(BlogSortField::from_param))
        .unwrap_or_default();
    let sort_direction = query
        .sort_direction
        .or_else(|| SORT_DIRECTION.text_default().and_then(SortDirection::parse))
        .unwrap_or_default();

    SanitizedBlogsQuery {
        search_name_term: query.search_name_term.filter(|term| !term.is_empty()),
        sort_by,
        sort_direction,
        page_number: PAGE_NUMBER.integer_or_default(query.page_number) as u64,
        page_size: PAGE_SIZE.integer_or_default(query.page_size) as u64,
    }
}

/// Case-insensitive substring match on `name`, or match-all without a term.
pub fn name_search_filter(search_name_term: Option<&str>) -> Value {
    match search_name_term {
        Some(term) => json!({ "name": { "$ilike": format!("%{}%", escape_like_pattern(term)) } }),
        None => json!({}),
    }
}

impl SanitizedBlogsQuery {
    pub fn filter(&self) -> Value {
        name_search_filter(self.search_name_term.as_deref())
    }

    pub fn skip(&self) -> u64 {
        skip_for(self.page_number, self.page_size)
    }

    /// Store query for the requested page.
    pub fn to_filter_data(&self) -> FilterData {
        FilterData {
            where_clause: Some(self.filter()),
            order: vec![FilterOrderInfo::new(self.sort_by.column(), self.sort_direction)],
            limit: Some(i64::try_from(self.page_size).unwrap_or(i64::MAX)),
            offset: Some(i64::try_from(self.skip()).unwrap_or(i64::MAX)),
        }
    }
}
