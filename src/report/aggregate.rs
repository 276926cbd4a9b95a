use super::extract::AuthRecord;
use crate::table::{Column, DataType, Table, Value};

/// The three consolidated long-format report views.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTables {
    pub ecl: Table,
    pub ead_variation: Table,
    pub lgd_variation: Table,
}

/// Row-concatenate per-file record batches into the three report views.
///
/// Rows appear in batch order, then source-row order; nothing is
/// deduplicated, sorted or joined. Zero batches produce three empty tables
/// that still carry the fixed headers.
pub fn aggregate(batches: &[Vec<AuthRecord>]) -> ReportTables {
    let records: Vec<&AuthRecord> = batches.iter().flatten().collect();

    let ecl = view(vec![
        date_column(&records),
        file_column(&records),
        metric_column("EAD", &records, |r| r.ead),
        metric_column("PD12", &records, |r| r.pd12),
        metric_column("LGD", &records, |r| r.lgd),
        metric_column("PDLT", &records, |r| r.pdlt),
        metric_column("stage1ecl", &records, |r| r.stage1_ecl),
        metric_column("stage2ecl", &records, |r| r.stage2_ecl),
        metric_column("stage3ecl", &records, |r| r.stage3_ecl),
    ]);

    let ead_variation = view(vec![
        date_column(&records),
        file_column(&records),
        metric_column("EAD", &records, |r| r.ead),
        metric_column("PreviousEAD", &records, |r| r.previous_ead),
        metric_column("changeEAD", &records, |r| r.change_ead),
        metric_column("pctChangeEAD", &records, |r| r.pct_change_ead),
    ]);

    let lgd_variation = view(vec![
        date_column(&records),
        file_column(&records),
        metric_column("LGD", &records, |r| r.lgd),
        metric_column("PreviousLGD", &records, |r| r.previous_lgd),
        metric_column("changeLGD", &records, |r| r.change_lgd),
        metric_column("pctChangeLGD", &records, |r| r.pct_change_lgd),
    ]);

    ReportTables {
        ecl,
        ead_variation,
        lgd_variation,
    }
}

fn view(columns: Vec<Column>) -> Table {
    // All columns are built from the same record slice, so lengths agree
    // and names are fixed distinct literals.
    Table::new(columns).expect("report view columns share one row count")
}

fn date_column(records: &[&AuthRecord]) -> Column {
    Column::new(
        "Date",
        DataType::Date,
        records.iter().map(|r| Value::Date(r.date)).collect(),
    )
    .expect("date cells are homogeneous")
}

fn file_column(records: &[&AuthRecord]) -> Column {
    Column::new(
        "File",
        DataType::Str,
        records
            .iter()
            .map(|r| Value::Str(r.file.clone()))
            .collect(),
    )
    .expect("file cells are homogeneous")
}

fn metric_column(
    name: &str,
    records: &[&AuthRecord],
    get: impl Fn(&AuthRecord) -> Option<f64>,
) -> Column {
    Column::new(
        name,
        DataType::Float,
        records
            .iter()
            .map(|r| get(r).map_or(Value::Null, Value::Float))
            .collect(),
    )
    .expect("metric cells are homogeneous")
}
