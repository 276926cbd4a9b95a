//! Report persistence: flat CSV files, a consolidated multi-sheet
//! workbook, parquet copies for columnar consumers, and the run summary.

pub mod columnar;
pub mod flat;
pub mod workbook;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::pipeline::RunSummary;
use crate::report::ReportTables;

/// Write every output artifact for one run into `out_dir`.
#[instrument(level = "info", skip(reports, summary, out_dir), fields(dir = %out_dir.as_ref().display()))]
pub fn write_all<P: AsRef<Path>>(
    reports: &ReportTables,
    summary: &RunSummary,
    out_dir: P,
) -> Result<()> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    flat::write_csv(&reports.ecl, out_dir.join("ECL_Report_All.csv"))?;
    flat::write_csv(&reports.ead_variation, out_dir.join("EAD_Variation_All.csv"))?;
    flat::write_csv(&reports.lgd_variation, out_dir.join("LGD_Variation_All.csv"))?;

    workbook::write_workbook(reports, out_dir.join("IFRS9_Reports_All_Files.xlsx"))?;

    columnar::write_parquet(&reports.ecl, out_dir.join("ECL_Report.parquet"))?;
    columnar::write_parquet(&reports.ead_variation, out_dir.join("EAD_Variation.parquet"))?;
    columnar::write_parquet(&reports.lgd_variation, out_dir.join("LGD_Variation.parquet"))?;

    let json = serde_json::to_string_pretty(summary).context("serializing run summary")?;
    fs::write(out_dir.join("run_summary.json"), json).context("writing run summary")?;

    info!("all report artifacts written");
    Ok(())
}
