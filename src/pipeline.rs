//! Orchestration over already-loaded tables: validate every source,
//! extract each authorization file, aggregate into the report views.
//!
//! All state flows through [`PipelineInput`]/[`PipelineOutput`]; there is
//! no process-wide mutable state.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::ExtractError;
use crate::report::{aggregate, extract, AuthRecord, ReportTables};
use crate::table::Table;
use crate::validate::{validate, RuleSet, Verdict};

/// Expected shapes of the three logical sources. Authorization extracts
/// carry 14 columns, the collateral extract 78 and the model config 4;
/// full-row duplicates are rejected everywhere.
const AUTH_COLUMNS: usize = 14;
const COLLATERAL_COLUMNS: usize = 78;
const MODEL_CONFIG_COLUMNS: usize = 4;

/// The already-loaded source tables for one run.
pub struct PipelineInput {
    pub collateral: Table,
    pub model_config: Table,
    /// Authorization extracts keyed by filename, in processing order.
    pub auth_reports: Vec<(String, Table)>,
}

/// One validation outcome, tagged with the table it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct TableVerdict {
    pub table: String,
    pub passed: bool,
    pub message: String,
}

/// Operator-facing record of what a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub validations: Vec<TableVerdict>,
    pub skipped_files: Vec<String>,
    pub ecl_rows: usize,
    pub ead_variation_rows: usize,
    pub lgd_variation_rows: usize,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub reports: ReportTables,
    pub summary: RunSummary,
}

fn shape_rules(n_cols: usize) -> RuleSet {
    RuleSet {
        n_cols: Some(n_cols),
        check_duplicates: true,
        ..Default::default()
    }
}

fn check(name: &str, table: &Table, rules: &RuleSet, out: &mut Vec<TableVerdict>) {
    let Verdict { passed, message } = validate(table, rules);
    info!("{}: {}, {}", name, passed, message);
    out.push(TableVerdict {
        table: name.to_string(),
        passed,
        message,
    });
}

/// Run the full validation → extraction → aggregation pipeline.
///
/// Validation is advisory: failures are logged and recorded in the summary
/// but never block processing. Files whose names carry no report date are
/// skipped with a warning; a missing required column aborts the run.
#[instrument(level = "info", skip(input), fields(auth_files = input.auth_reports.len()))]
pub fn run(input: &PipelineInput) -> Result<PipelineOutput> {
    let mut validations = Vec::with_capacity(input.auth_reports.len() + 2);
    for (name, table) in &input.auth_reports {
        check(name, table, &shape_rules(AUTH_COLUMNS), &mut validations);
    }
    check(
        "model_collateral",
        &input.collateral,
        &shape_rules(COLLATERAL_COLUMNS),
        &mut validations,
    );
    check(
        "model_config",
        &input.model_config,
        &shape_rules(MODEL_CONFIG_COLUMNS),
        &mut validations,
    );

    // Per-file extraction is independent, so fan out; collecting
    // positionally keeps the deterministic input order.
    let extractions: Vec<(&str, Result<Vec<AuthRecord>, ExtractError>)> = input
        .auth_reports
        .par_iter()
        .map(|(name, table)| (name.as_str(), extract(table, name)))
        .collect();

    let mut batches = Vec::with_capacity(extractions.len());
    let mut skipped_files = Vec::new();
    for (name, outcome) in extractions {
        match outcome {
            Ok(records) => batches.push(records),
            Err(err) if err.is_skip() => {
                warn!("{}; file skipped", err);
                skipped_files.push(name.to_string());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("extracting `{}`", name));
            }
        }
    }

    let reports = aggregate(&batches);
    info!(
        ecl_rows = reports.ecl.num_rows(),
        skipped = skipped_files.len(),
        "aggregation complete"
    );

    let summary = RunSummary {
        validations,
        skipped_files,
        ecl_rows: reports.ecl.num_rows(),
        ead_variation_rows: reports.ead_variation.num_rows(),
        lgd_variation_rows: reports.lgd_variation.num_rows(),
    };
    Ok(PipelineOutput { reports, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, DataType, Value};
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,eclreport=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn float_col(name: &str, values: &[Option<f64>]) -> Column {
        Column::new(
            name,
            DataType::Float,
            values
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Float))
                .collect(),
        )
        .unwrap()
    }

    fn auth_table(ead: f64, prev: Option<f64>) -> Table {
        let mut columns = vec![
            float_col("EAD", &[Some(ead)]),
            float_col("PD12", &[Some(0.1)]),
            float_col("PDLT", &[Some(0.2)]),
            float_col("LGD", &[Some(0.5)]),
        ];
        if let Some(p) = prev {
            columns.push(float_col("Previous EAD", &[Some(p)]));
        }
        Table::new(columns).unwrap()
    }

    fn tiny_table(n_cols: usize) -> Table {
        let columns = (0..n_cols)
            .map(|i| float_col(&format!("c{}", i), &[Some(i as f64)]))
            .collect();
        Table::new(columns).unwrap()
    }

    fn input(auth_reports: Vec<(String, Table)>) -> PipelineInput {
        PipelineInput {
            collateral: tiny_table(78),
            model_config: tiny_table(4),
            auth_reports,
        }
    }

    #[test]
    fn undated_files_are_skipped_not_fatal() -> Result<()> {
        init_test_logging();
        let output = run(&input(vec![
            ("2024-01-01.csv".to_string(), auth_table(100.0, None)),
            ("not-a-date.csv".to_string(), auth_table(999.0, None)),
            ("2024-02-01.csv".to_string(), auth_table(200.0, Some(100.0))),
        ]))?;

        assert_eq!(output.summary.skipped_files, vec!["not-a-date.csv"]);
        assert_eq!(output.reports.ecl.num_rows(), 2);
        // The skipped file contributes no rows to any view.
        let files = output.reports.ead_variation.column("File").unwrap();
        assert!(files
            .values()
            .iter()
            .all(|v| v != &Value::Str("not-a-date.csv".into())));
        Ok(())
    }

    #[test]
    fn missing_required_column_aborts_the_run() {
        init_test_logging();
        let broken = Table::new(vec![float_col("EAD", &[Some(1.0)])]).unwrap();
        let err = run(&input(vec![("2024-01-01.csv".to_string(), broken)])).unwrap_err();
        assert!(err.to_string().contains("2024-01-01.csv"));
    }

    #[test]
    fn validation_failures_are_advisory() -> Result<()> {
        init_test_logging();
        // 5-column auth table: fails the 14-column expectation but still
        // flows through extraction.
        let output = run(&input(vec![(
            "2024-02-01.csv".to_string(),
            auth_table(200.0, Some(100.0)),
        )]))?;

        let auth_verdict = &output.summary.validations[0];
        assert!(!auth_verdict.passed);
        assert_eq!(output.reports.ecl.num_rows(), 1);

        let collateral = output
            .summary
            .validations
            .iter()
            .find(|v| v.table == "model_collateral")
            .unwrap();
        assert!(collateral.passed);
        Ok(())
    }

    #[test]
    fn empty_run_produces_headed_empty_views() -> Result<()> {
        init_test_logging();
        let output = run(&input(Vec::new()))?;
        assert_eq!(output.reports.ecl.num_rows(), 0);
        assert_eq!(output.reports.ecl.num_columns(), 9);
        assert_eq!(output.summary.ecl_rows, 0);
        Ok(())
    }
}
