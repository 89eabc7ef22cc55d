use thiserror::Error;

/// Rejections raised while turning a `FilterData` into a store query.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Invalid WHERE clause: {0}")]
    InvalidWhereClause(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid operator data: {0}")]
    InvalidOperatorData(String),

    /// A negative `limit` or `offset`
    #[error("Invalid page window: {field} = {value}")]
    InvalidWindow { field: &'static str, value: i64 },
}
