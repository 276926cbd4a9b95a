//! Declarative table validation.
//!
//! A [`RuleSet`] bundles independent optional constraints; [`validate`]
//! applies them in a fixed order and stops at the first failure, returning
//! a pass/fail [`Verdict`] with an operator-readable message. Validation
//! never mutates the table and never panics on malformed data.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::table::{DataType, Table, Value};

/// Constraint bundle for one table. Unset constraints are skipped.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    /// Exact number of columns.
    pub n_cols: Option<usize>,
    /// Inclusive row-count bounds.
    pub n_rows: Option<(usize, usize)>,
    /// Columns that must be present.
    pub required_columns: Option<Vec<String>>,
    /// Exact declared type per column; a named column must exist.
    pub column_types: Option<BTreeMap<String, DataType>>,
    /// Reject full-row duplicates.
    pub check_duplicates: bool,
    /// Reject any null cell.
    pub check_nulls: bool,
    /// Columns whose values must be individually unique (checked only when
    /// the column is present).
    pub unique_columns: Option<Vec<String>>,
    /// Inclusive numeric bounds per column (present columns only).
    pub column_ranges: Option<BTreeMap<String, (f64, f64)>>,
    /// Columns that must be fully convertible to a calendar date.
    pub date_columns: Option<Vec<String>>,
    /// Allowed value set per column (present columns only).
    pub categorical_columns: Option<BTreeMap<String, Vec<Value>>>,
}

/// Outcome of validating one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    fn pass() -> Verdict {
        Verdict {
            passed: true,
            message: "all validations passed".to_string(),
        }
    }

    fn fail(message: impl Into<String>) -> Verdict {
        Verdict {
            passed: false,
            message: message.into(),
        }
    }
}

/// Check `table` against `rules`, stopping at the first violated constraint.
pub fn validate(table: &Table, rules: &RuleSet) -> Verdict {
    if let Some(n_cols) = rules.n_cols {
        if table.num_columns() != n_cols {
            return Verdict::fail(format!(
                "expected {} columns, found {}",
                n_cols,
                table.num_columns()
            ));
        }
    }

    if let Some((min_rows, max_rows)) = rules.n_rows {
        let rows = table.num_rows();
        if rows < min_rows || rows > max_rows {
            return Verdict::fail(format!(
                "row count {} outside expected range [{}, {}]",
                rows, min_rows, max_rows
            ));
        }
    }

    if let Some(required) = &rules.required_columns {
        let missing: Vec<&str> = required
            .iter()
            .map(String::as_str)
            .filter(|name| !table.has_column(name))
            .collect();
        if !missing.is_empty() {
            return Verdict::fail(format!("missing required columns: {}", missing.join(", ")));
        }
    }

    if let Some(column_types) = &rules.column_types {
        for (name, expected) in column_types {
            match table.column(name) {
                None => return Verdict::fail(format!("column `{}` not found", name)),
                Some(column) if column.dtype() != *expected => {
                    return Verdict::fail(format!(
                        "column `{}` has type {:?}, expected {:?}",
                        name,
                        column.dtype(),
                        expected
                    ));
                }
                Some(_) => {}
            }
        }
    }

    if rules.check_duplicates {
        let mut seen = HashSet::with_capacity(table.num_rows());
        for row in 0..table.num_rows() {
            if !seen.insert(table.row_key(row)) {
                return Verdict::fail("duplicate rows found");
            }
        }
    }

    if rules.check_nulls {
        let has_null = table
            .columns()
            .iter()
            .any(|c| c.values().iter().any(Value::is_null));
        if has_null {
            return Verdict::fail("table contains null values");
        }
    }

    if let Some(unique_columns) = &rules.unique_columns {
        for name in unique_columns {
            if let Some(column) = table.column(name) {
                let mut seen = HashSet::with_capacity(column.len());
                if column.values().iter().any(|v| !seen.insert(v.key())) {
                    return Verdict::fail(format!("column `{}` contains duplicate values", name));
                }
            }
        }
    }

    if let Some(column_ranges) = &rules.column_ranges {
        for (name, (low, high)) in column_ranges {
            if let Some(column) = table.column(name) {
                let out_of_range = column
                    .values()
                    .iter()
                    .any(|v| v.as_f64().map_or(true, |x| x < *low || x > *high));
                if out_of_range {
                    return Verdict::fail(format!(
                        "values in `{}` fall outside [{}, {}]",
                        name, low, high
                    ));
                }
            }
        }
    }

    if let Some(date_columns) = &rules.date_columns {
        for name in date_columns {
            if let Some(column) = table.column(name) {
                if !column.values().iter().all(parses_as_date) {
                    return Verdict::fail(format!(
                        "column `{}` contains values that do not parse as dates",
                        name
                    ));
                }
            }
        }
    }

    if let Some(categorical_columns) = &rules.categorical_columns {
        for (name, allowed) in categorical_columns {
            if let Some(column) = table.column(name) {
                let outside = column
                    .values()
                    .iter()
                    .any(|v| !allowed.iter().any(|a| a == v));
                if outside {
                    return Verdict::fail(format!(
                        "values in `{}` fall outside the allowed set",
                        name
                    ));
                }
            }
        }
    }

    Verdict::pass()
}

/// Date layouts accepted for string cells in date-checked columns.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

fn parses_as_date(value: &Value) -> bool {
    match value {
        Value::Date(_) | Value::Null => true,
        Value::Str(s) => {
            DATE_FORMATS
                .iter()
                .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
                || DATETIME_FORMATS
                    .iter()
                    .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn col(name: &str, dtype: DataType, values: Vec<Value>) -> Column {
        Column::new(name, dtype, values).unwrap()
    }

    fn floats(name: &str, values: &[f64]) -> Column {
        col(
            name,
            DataType::Float,
            values.iter().map(|v| Value::Float(*v)).collect(),
        )
    }

    fn strs(name: &str, values: &[&str]) -> Column {
        col(
            name,
            DataType::Str,
            values.iter().map(|s| Value::Str(s.to_string())).collect(),
        )
    }

    fn sample() -> Table {
        Table::new(vec![
            floats("EAD", &[100.0, 200.0]),
            strs("Grade", &["A", "B"]),
        ])
        .unwrap()
    }

    #[test]
    fn no_constraints_always_passes() {
        let verdict = validate(&sample(), &RuleSet::default());
        assert!(verdict.passed);
        assert_eq!(verdict.message, "all validations passed");
    }

    #[test]
    fn column_count_mismatch_fails() {
        let rules = RuleSet {
            n_cols: Some(3),
            ..Default::default()
        };
        let verdict = validate(&sample(), &rules);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "expected 3 columns, found 2");
    }

    #[test]
    fn row_bounds_are_inclusive() {
        let rules = RuleSet {
            n_rows: Some((2, 2)),
            ..Default::default()
        };
        assert!(validate(&sample(), &rules).passed);

        let rules = RuleSet {
            n_rows: Some((3, 10)),
            ..Default::default()
        };
        assert!(!validate(&sample(), &rules).passed);
    }

    #[test]
    fn missing_columns_are_listed() {
        let rules = RuleSet {
            required_columns: Some(vec!["EAD".into(), "LGD".into(), "PD12".into()]),
            ..Default::default()
        };
        let verdict = validate(&sample(), &rules);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "missing required columns: LGD, PD12");
    }

    #[test]
    fn column_type_must_match_exactly() {
        let rules = RuleSet {
            column_types: Some(BTreeMap::from([("EAD".to_string(), DataType::Int)])),
            ..Default::default()
        };
        let verdict = validate(&sample(), &rules);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "column `EAD` has type Float, expected Int");

        let rules = RuleSet {
            column_types: Some(BTreeMap::from([("Missing".to_string(), DataType::Int)])),
            ..Default::default()
        };
        assert_eq!(
            validate(&sample(), &rules).message,
            "column `Missing` not found"
        );
    }

    #[test]
    fn duplicate_rows_fail() {
        let table = Table::new(vec![
            floats("EAD", &[1.0, 1.0]),
            strs("Grade", &["A", "A"]),
        ])
        .unwrap();
        let rules = RuleSet {
            check_duplicates: true,
            ..Default::default()
        };
        assert_eq!(validate(&table, &rules).message, "duplicate rows found");
        assert!(validate(&sample(), &rules).passed);
    }

    #[test]
    fn null_cells_fail_when_checked() {
        let table = Table::new(vec![col(
            "EAD",
            DataType::Float,
            vec![Value::Float(1.0), Value::Null],
        )])
        .unwrap();
        let rules = RuleSet {
            check_nulls: true,
            ..Default::default()
        };
        assert!(!validate(&table, &rules).passed);
        assert!(validate(&table, &RuleSet::default()).passed);
    }

    #[test]
    fn unique_columns_skip_absent_ones() {
        let table = Table::new(vec![strs("Grade", &["A", "A"])]).unwrap();
        let rules = RuleSet {
            unique_columns: Some(vec!["Grade".into(), "NotHere".into()]),
            ..Default::default()
        };
        assert_eq!(
            validate(&table, &rules).message,
            "column `Grade` contains duplicate values"
        );
    }

    #[test]
    fn ranges_are_inclusive_and_nulls_fail() {
        let rules = RuleSet {
            column_ranges: Some(BTreeMap::from([("EAD".to_string(), (100.0, 200.0))])),
            ..Default::default()
        };
        assert!(validate(&sample(), &rules).passed);

        let with_null = Table::new(vec![col(
            "EAD",
            DataType::Float,
            vec![Value::Float(150.0), Value::Null],
        )])
        .unwrap();
        assert!(!validate(&with_null, &rules).passed);

        let rules = RuleSet {
            column_ranges: Some(BTreeMap::from([("EAD".to_string(), (0.0, 150.0))])),
            ..Default::default()
        };
        assert!(!validate(&sample(), &rules).passed);
    }

    #[test]
    fn date_columns_accept_strings_and_typed_dates() {
        let table = Table::new(vec![
            strs("AsOf", &["2024-01-01", "2024/02/01 10:30:00"]),
            strs("Broken", &["2024-01-01", "yesterday"]),
        ])
        .unwrap();

        let rules = RuleSet {
            date_columns: Some(vec!["AsOf".into()]),
            ..Default::default()
        };
        assert!(validate(&table, &rules).passed);

        let rules = RuleSet {
            date_columns: Some(vec!["Broken".into()]),
            ..Default::default()
        };
        assert_eq!(
            validate(&table, &rules).message,
            "column `Broken` contains values that do not parse as dates"
        );
    }

    #[test]
    fn categorical_membership() {
        let rules = RuleSet {
            categorical_columns: Some(BTreeMap::from([(
                "Grade".to_string(),
                vec![Value::Str("A".into()), Value::Str("B".into())],
            )])),
            ..Default::default()
        };
        assert!(validate(&sample(), &rules).passed);

        let rules = RuleSet {
            categorical_columns: Some(BTreeMap::from([(
                "Grade".to_string(),
                vec![Value::Str("A".into())],
            )])),
            ..Default::default()
        };
        assert_eq!(
            validate(&sample(), &rules).message,
            "values in `Grade` fall outside the allowed set"
        );
    }

    #[test]
    fn first_violated_constraint_wins() {
        // Fails column count (1), required columns (3) and nulls (6) at once;
        // the column-count failure must be the one reported.
        let table = Table::new(vec![col(
            "EAD",
            DataType::Float,
            vec![Value::Float(1.0), Value::Null],
        )])
        .unwrap();
        let rules = RuleSet {
            n_cols: Some(2),
            required_columns: Some(vec!["LGD".into()]),
            check_nulls: true,
            ..Default::default()
        };
        let verdict = validate(&table, &rules);
        assert_eq!(verdict.message, "expected 2 columns, found 1");

        // Drop the count constraint: the required-columns failure surfaces next.
        let rules = RuleSet {
            required_columns: Some(vec!["LGD".into()]),
            check_nulls: true,
            ..Default::default()
        };
        assert_eq!(
            validate(&table, &rules).message,
            "missing required columns: LGD"
        );
    }
}
