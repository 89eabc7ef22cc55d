use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter::validate_column;
use super::types::{FilterOp, FilterWhereInfo};

/// Translates a JSON predicate into a Postgres WHERE clause with `$n` parameters.
pub struct FilterWhere {
    param_values: Vec<Value>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self { param_values: vec![] }
    }

    /// Returns an empty clause for a predicate that matches everything.
    pub fn generate(where_data: &Value) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new();
        let clause = filter_where.build_clause(where_data)?;
        Ok((clause.unwrap_or_default(), filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    /// Split a predicate object into one condition per field operator or logical key.
    pub fn parse_where_data(obj: &Map<String, Value>) -> Result<Vec<FilterWhereInfo>, FilterError> {
        let mut conditions = Vec::new();
        for (key, value) in obj {
            if key.starts_with('$') {
                let operator = FilterOp::from_key(key)
                    .filter(FilterOp::is_logical)
                    .ok_or_else(|| FilterError::UnsupportedOperator(key.clone()))?;
                conditions.push(FilterWhereInfo { column: String::new(), operator, data: value.clone() });
                continue;
            }

            validate_column(key)?;
            match value {
                Value::Object(ops) if ops.keys().all(|k| k.starts_with('$')) && !ops.is_empty() => {
                    for (op_key, op_val) in ops {
                        let operator = FilterOp::from_key(op_key)
                            .filter(|op| !op.is_logical())
                            .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                        conditions.push(FilterWhereInfo { column: key.clone(), operator, data: op_val.clone() });
                    }
                }
                // Implicit equality: { field: value }
                _ => conditions.push(FilterWhereInfo { column: key.clone(), operator: FilterOp::Eq, data: value.clone() }),
            }
        }
        Ok(conditions)
    }

    fn build_clause(&mut self, where_data: &Value) -> Result<Option<String>, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(None),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        };

        let mut sql_conditions = vec![];
        for condition in Self::parse_where_data(obj)? {
            sql_conditions.push(self.build_sql_condition(&condition)?);
        }
        if sql_conditions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(sql_conditions.join(" AND ")))
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", condition.column);
        match condition.operator {
            FilterOp::And | FilterOp::Or => {
                let arr = condition.data.as_array().ok_or_else(|| {
                    FilterError::InvalidOperatorData(format!("{:?} requires array", condition.operator))
                })?;
                let is_and = condition.operator == FilterOp::And;
                if arr.is_empty() {
                    return Ok(if is_and { "1=1" } else { "1=0" }.to_string());
                }
                let mut sql_parts = Vec::new();
                for v in arr {
                    let sql = self.build_clause(v)?.unwrap_or_else(|| "1=1".to_string());
                    sql_parts.push(format!("({})", sql));
                }
                let joiner = if is_and { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            FilterOp::Not => {
                let sql = self.build_clause(&condition.data)?.unwrap_or_else(|| "1=1".to_string());
                Ok(format!("NOT ({})", sql))
            }
            FilterOp::Eq => {
                if condition.data.is_null() { Ok(format!("{} IS NULL", quoted_column)) }
                else { Ok(format!("{} = {}", quoted_column, self.param(condition.data.clone()))) }
            }
            FilterOp::Ne => {
                if condition.data.is_null() { Ok(format!("{} IS NOT NULL", quoted_column)) }
                else { Ok(format!("{} <> {}", quoted_column, self.param(condition.data.clone()))) }
            }
            FilterOp::Gt => Ok(format!("{} > {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Gte => Ok(format!("{} >= {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Lt => Ok(format!("{} < {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Lte => Ok(format!("{} <= {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Like | FilterOp::ILike => {
                if !condition.data.is_string() {
                    return Err(FilterError::InvalidOperatorData("pattern operators require a string".to_string()));
                }
                let keyword = if condition.operator == FilterOp::Like { "LIKE" } else { "ILIKE" };
                Ok(format!("{} {} {}", quoted_column, keyword, self.param(condition.data.clone())))
            }
            FilterOp::In => {
                if let Value::Array(values) = &condition.data {
                    if values.is_empty() { return Ok("1=0".to_string()); }
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                    Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
                } else {
                    Ok(format!("{} = {}", quoted_column, self.param(condition.data.clone())))
                }
            }
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

impl Default for FilterWhere {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape LIKE metacharacters so the text matches literally inside a pattern.
pub fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_has_no_clause() {
        let (sql, params) = FilterWhere::generate(&json!({})).unwrap();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn numbers_params_across_nested_clauses() {
        let where_data = json!({
            "$or": [
                { "name": { "$ilike": "%a%" } },
                { "description": "b", "isMembership": true }
            ],
            "websiteUrl": { "$ne": null }
        });
        let (sql, params) = FilterWhere::generate(&where_data).unwrap();
        assert_eq!(
            sql,
            "((\"name\" ILIKE $1) OR (\"description\" = $2 AND \"isMembership\" = $3)) AND \"websiteUrl\" IS NOT NULL"
        );
        assert_eq!(params, vec![json!("%a%"), json!("b"), json!(true)]);
    }

    #[test]
    fn not_and_in() {
        let (sql, params) = FilterWhere::generate(&json!({
            "$not": { "name": { "$in": ["x", "y"] } }
        }))
        .unwrap();
        assert_eq!(sql, "NOT (\"name\" IN ($1, $2))");
        assert_eq!(params.len(), 2);

        let (sql, _) = FilterWhere::generate(&json!({ "name": { "$in": [] } })).unwrap();
        assert_eq!(sql, "1=0");
    }

    #[test]
    fn rejects_unknown_operators_and_columns() {
        assert!(matches!(
            FilterWhere::generate(&json!({ "name": { "$regex": "x" } })),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            FilterWhere::generate(&json!({ "$xor": [] })),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            FilterWhere::generate(&json!({ "na me": 1 })),
            Err(FilterError::InvalidColumn(_))
        ));
        assert!(FilterWhere::generate(&json!({ "name": { "$like": 5 } })).is_err());
        assert!(FilterWhere::validate(&json!("raw sql")).is_err());
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like_pattern("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }
}
