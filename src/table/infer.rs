use chrono::NaiveDate;

use super::{Column, DataType, Value};
use crate::error::TableError;

/// Cell spellings treated as missing values when loading raw extracts.
const NA_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "NULL", "null"];

/// Calendar-date layouts accepted during inference.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

fn is_na(cell: &str) -> bool {
    NA_MARKERS.contains(&cell.trim())
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
}

/// Infer a column type from raw string cells and build the typed column.
///
/// Every non-missing cell must agree for a narrow type to win: all i64 ⇒
/// `Int`, all f64 ⇒ `Float`, all calendar dates ⇒ `Date`; anything mixed
/// falls back to `Str`. A column with no non-missing cells is `Str`.
pub fn build_column(name: &str, raw: &[String]) -> Result<Column, TableError> {
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_date = true;

    for cell in raw {
        let cell = cell.trim();
        if is_na(cell) {
            continue;
        }
        any = true;
        all_int = all_int && cell.parse::<i64>().is_ok();
        all_float = all_float && cell.parse::<f64>().is_ok();
        all_date = all_date && parse_date(cell).is_some();
    }

    let dtype = if !any {
        DataType::Str
    } else if all_int {
        DataType::Int
    } else if all_float {
        DataType::Float
    } else if all_date {
        DataType::Date
    } else {
        DataType::Str
    };

    let values = raw
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            if is_na(cell) {
                return Value::Null;
            }
            match dtype {
                DataType::Int => Value::Int(cell.parse().expect("checked during inference")),
                DataType::Float => Value::Float(cell.parse().expect("checked during inference")),
                DataType::Date => Value::Date(parse_date(cell).expect("checked during inference")),
                DataType::Str => Value::Str(cell.to_string()),
            }
        })
        .collect();

    Column::new(name, dtype, values)
}
