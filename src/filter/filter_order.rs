use super::error::FilterError;
use super::filter::validate_column;
use super::types::FilterOrderInfo;

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        if infos.is_empty() { return Ok(String::new()); }
        let mut parts = Vec::with_capacity(infos.len());
        for info in infos {
            validate_column(&info.column)?;
            match &info.collation {
                Some(collation) => {
                    validate_column(collation)?;
                    parts.push(format!("\"{}\" COLLATE \"{}\" {}", info.column, collation, info.sort.to_sql()));
                }
                None => parts.push(format!("\"{}\" {}", info.column, info.sort.to_sql())),
            }
        }
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}
