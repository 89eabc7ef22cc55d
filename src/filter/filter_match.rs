use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FilterOp, FilterOrderInfo, FilterWhereInfo, SortDirection};

/// Evaluates the JSON predicate language directly against documents.
///
/// Semantics follow the SQL compiler in [`FilterWhere`]: missing fields read as
/// `null`, comparisons between different JSON types never match, and LIKE
/// patterns use `%`, `_` and backslash escapes.
pub struct FilterMatch;

impl FilterMatch {
    pub fn matches(where_data: &Value, document: &Value) -> Result<bool, FilterError> {
        FilterWhere::validate(where_data)?;
        match where_data {
            Value::Object(obj) => Self::matches_object(obj, document),
            _ => Ok(true),
        }
    }

    fn matches_object(obj: &Map<String, Value>, document: &Value) -> Result<bool, FilterError> {
        for condition in FilterWhere::parse_where_data(obj)? {
            if !Self::matches_condition(&condition, document)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_condition(condition: &FilterWhereInfo, document: &Value) -> Result<bool, FilterError> {
        let data = &condition.data;
        match condition.operator {
            FilterOp::And | FilterOp::Or => {
                let arr = data.as_array().ok_or_else(|| {
                    FilterError::InvalidOperatorData(format!("{:?} requires array", condition.operator))
                })?;
                let mut results = Vec::with_capacity(arr.len());
                for sub in arr {
                    results.push(Self::matches(sub, document)?);
                }
                Ok(if condition.operator == FilterOp::And {
                    results.iter().all(|r| *r)
                } else {
                    results.iter().any(|r| *r)
                })
            }
            FilterOp::Not => Ok(!Self::matches(data, document)?),
            _ => {
                let field = document.get(&condition.column).unwrap_or(&Value::Null);
                Self::matches_field(condition.operator, field, data)
            }
        }
    }

    fn matches_field(operator: FilterOp, field: &Value, data: &Value) -> Result<bool, FilterError> {
        Ok(match operator {
            FilterOp::Eq => field == data,
            FilterOp::Ne => field != data,
            FilterOp::Gt => Self::same_kind(field, data) && compare_values(field, data) == Ordering::Greater,
            FilterOp::Gte => Self::same_kind(field, data) && compare_values(field, data) != Ordering::Less,
            FilterOp::Lt => Self::same_kind(field, data) && compare_values(field, data) == Ordering::Less,
            FilterOp::Lte => Self::same_kind(field, data) && compare_values(field, data) != Ordering::Greater,
            FilterOp::Like | FilterOp::ILike => {
                let pattern = data.as_str().ok_or_else(|| {
                    FilterError::InvalidOperatorData("pattern operators require a string".to_string())
                })?;
                match field.as_str() {
                    Some(text) => like_matches(pattern, text, operator == FilterOp::ILike),
                    None => false,
                }
            }
            FilterOp::In => match data {
                Value::Array(values) => values.contains(field),
                other => field == other,
            },
            FilterOp::And | FilterOp::Or | FilterOp::Not => {
                return Err(FilterError::UnsupportedOperator(format!("{:?} on a field", operator)))
            }
        })
    }

    fn same_kind(a: &Value, b: &Value) -> bool {
        type_rank(a) == type_rank(b) && !a.is_null()
    }

    /// Order documents by the given columns; ties keep their incoming order.
    pub fn sort<T>(items: &mut [T], order: &[FilterOrderInfo], document: impl Fn(&T) -> &Value) {
        if order.is_empty() {
            return;
        }
        items.sort_by(|a, b| {
            let (a, b) = (document(a), document(b));
            for info in order {
                let left = a.get(&info.column).unwrap_or(&Value::Null);
                let right = b.get(&info.column).unwrap_or(&Value::Null);
                let ordering = match info.sort {
                    SortDirection::Asc => compare_values(left, right),
                    SortDirection::Desc => compare_values(right, left),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Total order over JSON values: null, numbers, strings, objects, arrays, booleans.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ordering = compare_values(l, r);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) | (Value::Null, Value::Null) => Ordering::Equal,
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    Any,
    One,
    Lit(char),
}

fn tokenize_like(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::Any,
            '_' => LikeToken::One,
            '\\' => LikeToken::Lit(chars.next().unwrap_or('\\')),
            other => LikeToken::Lit(other),
        });
    }
    tokens
}

/// SQL LIKE matching with backtracking over the last `%`.
pub fn like_matches(pattern: &str, text: &str, case_insensitive: bool) -> bool {
    let (pattern, text) = if case_insensitive {
        (pattern.to_lowercase(), text.to_lowercase())
    } else {
        (pattern.to_string(), text.to_string())
    };
    let tokens = tokenize_like(&pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while t < text.len() {
        let step = match tokens.get(p) {
            Some(LikeToken::One) => true,
            Some(LikeToken::Lit(c)) => *c == text[t],
            _ => false,
        };
        if step {
            t += 1;
            p += 1;
        } else if tokens.get(p) == Some(&LikeToken::Any) {
            star = Some(p);
            mark = t;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }
    while tokens.get(p) == Some(&LikeToken::Any) {
        p += 1;
    }
    p == tokens.len()
}
