use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "$eq")] Eq,
    #[serde(rename = "$ne")] Ne,
    #[serde(rename = "$gt")] Gt,
    #[serde(rename = "$gte")] Gte,
    #[serde(rename = "$lt")] Lt,
    #[serde(rename = "$lte")] Lte,

    #[serde(rename = "$like")] Like,
    #[serde(rename = "$ilike")] ILike,

    #[serde(rename = "$in")] In,

    #[serde(rename = "$and")] And,
    #[serde(rename = "$or")] Or,
    #[serde(rename = "$not")] Not,
}

impl FilterOp {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$like" => FilterOp::Like,
            "$ilike" => FilterOp::ILike,
            "$in" => FilterOp::In,
            "$and" => FilterOp::And,
            "$or" => FilterOp::Or,
            "$not" => FilterOp::Not,
            _ => return None,
        })
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, FilterOp::And | FilterOp::Or | FilterOp::Not)
    }
}

/// Store-agnostic query: a JSON predicate plus ordering and a page window.
#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub where_clause: Option<serde_json::Value>,
    pub order: Vec<FilterOrderInfo>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Strict parse: only `asc` or `desc`, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
    /// SQL collation for text columns, e.g. `C` for byte order
    pub collation: Option<String>,
}

impl FilterOrderInfo {
    pub fn new(column: impl Into<String>, sort: SortDirection) -> Self {
        Self { column: column.into(), sort, collation: None }
    }

    pub fn collate(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_direction_is_strict() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("descending"), None);
        assert_eq!(SortDirection::parse("up"), None);
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }

    #[test]
    fn maps_operator_keys() {
        assert_eq!(FilterOp::from_key("$neq"), Some(FilterOp::Ne));
        assert_eq!(FilterOp::from_key("$regex"), None);
        assert!(FilterOp::from_key("$or").unwrap().is_logical());
    }
}
