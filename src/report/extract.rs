use chrono::NaiveDate;

use super::date::report_date_from_filename;
use crate::error::ExtractError;
use crate::table::{Column, Table};

/// Columns every authorization extract must carry. There is no alternate
/// spelling for these, so absence aborts extraction for the file.
pub const REQUIRED_COLUMNS: &[&str] = &["EAD", "PD12", "PDLT", "LGD"];

/// Accepted spellings for the previous-period columns, in lookup order.
/// Extracts drift between underscore and space forms.
pub const PREVIOUS_EAD_ALIASES: &[&str] = &["Previous_EAD", "Previous EAD"];
pub const PREVIOUS_LGD_ALIASES: &[&str] = &["Previous_LGD", "Previous LGD"];

/// One normalized exposure row derived from an authorization extract.
/// Immutable once built; every numeric field is optional so that missing
/// source cells and degenerate divisions stay typed nulls.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRecord {
    pub date: NaiveDate,
    pub file: String,
    pub ead: Option<f64>,
    pub pd12: Option<f64>,
    pub pdlt: Option<f64>,
    pub lgd: Option<f64>,
    pub previous_ead: Option<f64>,
    pub previous_lgd: Option<f64>,
    pub stage1_ecl: Option<f64>,
    pub stage2_ecl: Option<f64>,
    pub stage3_ecl: Option<f64>,
    pub change_ead: Option<f64>,
    pub pct_change_ead: Option<f64>,
    pub change_lgd: Option<f64>,
    pub pct_change_lgd: Option<f64>,
}

impl AuthRecord {
    #[allow(clippy::too_many_arguments)]
    fn new(
        date: NaiveDate,
        file: &str,
        ead: Option<f64>,
        pd12: Option<f64>,
        pdlt: Option<f64>,
        lgd: Option<f64>,
        previous_ead: Option<f64>,
        previous_lgd: Option<f64>,
    ) -> AuthRecord {
        let change_ead = difference(ead, previous_ead);
        let change_lgd = difference(lgd, previous_lgd);
        AuthRecord {
            date,
            file: file.to_string(),
            ead,
            pd12,
            pdlt,
            lgd,
            previous_ead,
            previous_lgd,
            stage1_ecl: product(&[ead, pd12, lgd]),
            stage2_ecl: product(&[ead, pdlt, lgd]),
            stage3_ecl: product(&[ead, lgd]),
            change_ead,
            pct_change_ead: pct_change(change_ead, previous_ead),
            change_lgd,
            pct_change_lgd: pct_change(change_lgd, previous_lgd),
        }
    }
}

/// Build one [`AuthRecord`] per source row of `table`.
///
/// The reporting date comes from `filename` (`YYYY-MM-DD`, extension
/// stripped); an undated filename is the recoverable
/// [`ExtractError::FilenameDate`]. Previous-period columns resolve through
/// the alias lists and fall back to all-null when neither spelling exists.
pub fn extract(table: &Table, filename: &str) -> Result<Vec<AuthRecord>, ExtractError> {
    let date = report_date_from_filename(filename)
        .ok_or_else(|| ExtractError::FilenameDate(filename.to_string()))?;

    let ead = required_numeric(table, "EAD", filename)?;
    let pd12 = required_numeric(table, "PD12", filename)?;
    let pdlt = required_numeric(table, "PDLT", filename)?;
    let lgd = required_numeric(table, "LGD", filename)?;
    let previous_ead = alias_numeric(table, PREVIOUS_EAD_ALIASES);
    let previous_lgd = alias_numeric(table, PREVIOUS_LGD_ALIASES);

    let mut records = Vec::with_capacity(table.num_rows());
    for row in 0..table.num_rows() {
        records.push(AuthRecord::new(
            date,
            filename,
            ead[row],
            pd12[row],
            pdlt[row],
            lgd[row],
            previous_ead.as_ref().and_then(|c| c[row]),
            previous_lgd.as_ref().and_then(|c| c[row]),
        ));
    }
    Ok(records)
}

fn numeric_cells(column: &Column) -> Vec<Option<f64>> {
    column.values().iter().map(|v| v.as_f64()).collect()
}

fn required_numeric(
    table: &Table,
    name: &str,
    file: &str,
) -> Result<Vec<Option<f64>>, ExtractError> {
    table
        .column(name)
        .map(numeric_cells)
        .ok_or_else(|| ExtractError::MissingColumn {
            column: name.to_string(),
            file: file.to_string(),
        })
}

/// First alias present wins; none present means the column is entirely
/// missing for this file.
fn alias_numeric(table: &Table, aliases: &[&str]) -> Option<Vec<Option<f64>>> {
    aliases
        .iter()
        .find_map(|name| table.column(name))
        .map(numeric_cells)
}

fn product(factors: &[Option<f64>]) -> Option<f64> {
    factors.iter().try_fold(1.0, |acc, f| f.map(|v| acc * v))
}

fn difference(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (current, previous) {
        (Some(c), Some(p)) => Some(c - p),
        _ => None,
    }
}

/// Percentage change against the previous period. A zero or missing
/// previous value has no defined change, so the result is `None` rather
/// than an infinity sentinel.
fn pct_change(change: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (change, previous) {
        (Some(c), Some(p)) if p != 0.0 => Some(c / p * 100.0),
        _ => None,
    }
}
