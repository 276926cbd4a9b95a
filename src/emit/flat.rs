use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::table::Table;

/// Write one table as a flat CSV file: header row first, nulls as empty
/// cells, dates as `YYYY-MM-DD`.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr =
        Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    wtr.write_record(table.column_names())
        .context("writing header row")?;
    for row in 0..table.num_rows() {
        wtr.write_record(table.columns().iter().map(|c| c.get(row).to_string()))
            .with_context(|| format!("writing row {}", row))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
