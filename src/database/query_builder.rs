use serde_json::Value;
use sqlx::{postgres::PgArguments, Arguments, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterData, SqlResult};

/// Runs `Filter`-generated SQL against one collection and decodes rows as `T`.
pub struct QueryBuilder<T> {
    table_name: String,
    filter: Option<Filter>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = table_name.into();
        // Reuse Filter table name validation
        Filter::new(&name)?;
        Ok(Self {
            table_name: name,
            filter: None,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        let mut filter = Filter::new(&self.table_name)?;
        filter.assign(filter_data)?;
        self.filter = Some(filter);
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let SqlResult { query, params } = match self.filter {
            Some(filter) => filter.to_sql()?,
            None => SqlResult { query: format!("SELECT * FROM \"{}\"", self.table_name), params: vec![] },
        };
        tracing::debug!(%query, params = params.len(), "select");

        let rows = sqlx::query_as_with::<_, T, _>(&query, bind_arguments(params))
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let SqlResult { query, params } = match self.filter {
            Some(filter) => filter.to_count_sql()?,
            None => SqlResult { query: format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name), params: vec![] },
        };
        tracing::debug!(%query, params = params.len(), "count");

        let row = sqlx::query_with(&query, bind_arguments(params)).fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

/// Positional arguments for `$1..$n`, typed from each JSON value.
fn bind_arguments(params: Vec<Value>) -> PgArguments {
    let mut args = PgArguments::default();
    for value in params {
        match value {
            Value::Null => args.add(None::<String>),
            Value::Bool(b) => args.add(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => args.add(i),
                (None, Some(f)) => args.add(f),
                (None, None) => args.add(n.to_string()),
            },
            Value::String(s) => args.add(s),
            // FilterWhere expands arrays into one parameter per element
            Value::Array(_) => {}
            object @ Value::Object(_) => args.add(object),
        }
    }
    args
}

