use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, SqlResult};

/// Compiles a [`FilterData`] into parameterized Postgres statements for one table.
pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_data: None,
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if !data.order.is_empty() { self.order(data.order)?; }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        else if let Some(offset) = data.offset { self.offset(offset)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, order: Vec<FilterOrderInfo>) -> Result<&mut Self, FilterError> {
        for info in &order {
            validate_column(&info.column)?;
        }
        self.order_data = order;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidWindow { field: "limit", value: limit }); }
        if let Some(off) = offset { self.offset(off)?; }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn offset(&mut self, offset: i64) -> Result<&mut Self, FilterError> {
        if offset < 0 { return Err(FilterError::InvalidWindow { field: "offset", value: offset }); }
        self.offset = Some(offset);
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let order_clause = FilterOrder::generate(&self.order_data)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT * FROM \"{}\"", self.table_name),
            if where_result.query.is_empty() { String::new() } else { format!("WHERE {}", where_result.query) },
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data)?,
            None => (String::new(), vec![]),
        };
        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = if where_result.query.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name)
        } else {
            format!("SELECT COUNT(*) as count FROM \"{}\" WHERE {}", self.table_name, where_result.query)
        };
        Ok(SqlResult { query, params: where_result.params })
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

/// Column names are quoted into SQL verbatim, so only plain identifiers pass.
pub(crate) fn validate_column(name: &str) -> Result<(), FilterError> {
    if !is_identifier(name) {
        return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::SortDirection;
    use serde_json::json;

    #[test]
    fn builds_paged_select() {
        let mut filter = Filter::new("blogs").unwrap();
        filter
            .assign(FilterData {
                where_clause: Some(json!({ "name": { "$ilike": "%exam%" } })),
                order: vec![FilterOrderInfo::new("createdAt", SortDirection::Desc)],
                limit: Some(10),
                offset: Some(20),
            })
            .unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"blogs\" WHERE \"name\" ILIKE $1 ORDER BY \"createdAt\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![json!("%exam%")]);
    }

    #[test]
    fn empty_where_selects_everything() {
        let mut filter = Filter::new("blogs").unwrap();
        filter.where_clause(json!({})).unwrap();

        assert_eq!(filter.to_sql().unwrap().query, "SELECT * FROM \"blogs\"");
        assert_eq!(filter.to_count_sql().unwrap().query, "SELECT COUNT(*) as count FROM \"blogs\"");
    }

    #[test]
    fn count_shares_where_params() {
        let mut filter = Filter::new("blogs").unwrap();
        filter.where_clause(json!({ "isMembership": false })).unwrap();

        let sql = filter.to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) as count FROM \"blogs\" WHERE \"isMembership\" = $1");
        assert_eq!(sql.params, vec![json!(false)]);
    }

    #[test]
    fn rejects_bad_identifiers() {
        assert!(Filter::new("blogs; DROP TABLE blogs").is_err());
        assert!(Filter::new("").is_err());

        let mut filter = Filter::new("blogs").unwrap();
        assert!(filter.order(vec![FilterOrderInfo::new("name\" --", SortDirection::Asc)]).is_err());
        assert!(filter.limit(-1, None).is_err());
        assert!(filter.limit(5, Some(-3)).is_err());
    }
}
