use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use crate::report::ReportTables;
use crate::table::{Table, Value};

/// Sheet names for the consolidated workbook, in sheet order.
const SHEETS: &[&str] = &["ECL_Report", "EAD_Variation", "LGD_Variation"];

/// Write the three report views into one workbook, one sheet per view.
pub fn write_workbook<P: AsRef<Path>>(reports: &ReportTables, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    let views = [&reports.ecl, &reports.ead_variation, &reports.lgd_variation];
    for (sheet, table) in SHEETS.iter().copied().zip(views) {
        write_sheet(&mut workbook, sheet, table)
            .with_context(|| format!("writing sheet {}", sheet))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    Ok(())
}

fn write_sheet(workbook: &mut Workbook, sheet: &str, table: &Table) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (col, column) in table.columns().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, column.name())?;
        for row in 0..column.len() {
            let cell = row as u32 + 1;
            match column.get(row) {
                Value::Float(v) => {
                    worksheet.write_number(cell, col, *v)?;
                }
                Value::Int(v) => {
                    worksheet.write_number(cell, col, *v as f64)?;
                }
                Value::Str(s) => {
                    worksheet.write_string(cell, col, s.as_str())?;
                }
                Value::Date(d) => {
                    worksheet.write_string(cell, col, d.to_string().as_str())?;
                }
                Value::Null => {}
            }
        }
    }
    Ok(())
}
