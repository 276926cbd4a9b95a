use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use eclreport::{
    config::PipelineConfig,
    emit, load,
    pipeline::{self, PipelineInput},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,eclreport=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config ───────────────────────────────────────────────────
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let config = PipelineConfig::load(&config_path)?;

    // ─── 3) load source tables ───────────────────────────────────────
    let collateral =
        load::load_csv(&config.collateral_path).context("loading model collateral")?;
    let model_config =
        load::load_csv(&config.model_config_path).context("loading model config")?;
    let auth_reports =
        load::load_auth_dir(&config.auth_dir).context("loading authorization extracts")?;
    info!("loaded {} authorization extracts", auth_reports.len());

    // ─── 4) validate → extract → aggregate ───────────────────────────
    let input = PipelineInput {
        collateral,
        model_config,
        auth_reports,
    };
    let output = pipeline::run(&input)?;

    // ─── 5) persist reports ──────────────────────────────────────────
    emit::write_all(&output.reports, &output.summary, &config.out_dir)?;
    info!(
        ecl_rows = output.reports.ecl.num_rows(),
        skipped = output.summary.skipped_files.len(),
        "reports written to {}",
        config.out_dir.display()
    );
    Ok(())
}
