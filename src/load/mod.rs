//! CSV loading boundary: reads extracts off disk into typed [`Table`]s.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::{debug, instrument};

use crate::table::{infer, Table};

/// Read one CSV file into a typed table. The first row is the header;
/// ragged data rows are padded with nulls. Column types are inferred from
/// the cells (see [`infer::build_column`]).
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header row of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (idx, record) in rdr.records().enumerate() {
        let record = record
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        for (col, raw) in cells.iter_mut().enumerate() {
            raw.push(record.get(col).unwrap_or_default().to_string());
        }
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (name, raw) in headers.iter().zip(&cells) {
        columns.push(infer::build_column(name, raw)?);
    }

    let table = Table::new(columns)?;
    debug!(
        rows = table.num_rows(),
        cols = table.num_columns(),
        "loaded table"
    );
    Ok(table)
}

/// Discover and load every authorization extract: each `*.csv` directly
/// inside `dir`, sorted by filename so downstream concatenation order is
/// deterministic.
#[instrument(level = "info", skip(dir), fields(dir = %dir.as_ref().display()))]
pub fn load_auth_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, Table)>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .and_then(|s| s.to_str())
                .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
        {
            paths.push(path);
        }
    }
    paths.sort();

    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let table = load_csv(&path).with_context(|| format!("loading {}", path.display()))?;
        tables.push((name, table));
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DataType, Value};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn loads_and_types_a_csv() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("2024-01-01.csv");
        let mut f = fs::File::create(&path)?;
        writeln!(f, "EAD,PD12,Grade,AsOf")?;
        writeln!(f, "100.5,0.1,A,2024-01-01")?;
        writeln!(f, ",0.2,B,2024-02-01")?;

        let table = load_csv(&path)?;
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("EAD").unwrap().dtype(), DataType::Float);
        assert_eq!(table.column("EAD").unwrap().get(1), &Value::Null);
        assert_eq!(table.column("Grade").unwrap().dtype(), DataType::Str);
        assert_eq!(table.column("AsOf").unwrap().dtype(), DataType::Date);
        Ok(())
    }

    #[test]
    fn pads_short_rows_with_nulls() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("short.csv");
        let mut f = fs::File::create(&path)?;
        writeln!(f, "a,b,c")?;
        writeln!(f, "1,2")?;

        let table = load_csv(&path)?;
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.column("c").unwrap().get(0), &Value::Null);
        Ok(())
    }

    #[test]
    fn directory_scan_is_sorted_and_csv_only() -> Result<()> {
        let dir = tempdir()?;
        for name in ["2024-02-01.csv", "2024-01-01.csv", "notes.txt"] {
            let mut f = fs::File::create(dir.path().join(name))?;
            writeln!(f, "EAD")?;
            writeln!(f, "1.0")?;
        }

        let tables = load_auth_dir(dir.path())?;
        let names: Vec<&str> = tables.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["2024-01-01.csv", "2024-02-01.csv"]);
        Ok(())
    }
}
