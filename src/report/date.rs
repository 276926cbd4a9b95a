use std::path::Path;

use chrono::NaiveDate;

/// Parse the reporting date out of an extract filename.
///
/// The stem (extension stripped) must be exactly `YYYY-MM-DD`, the naming
/// convention for authorization extracts. Returns `None` for anything else;
/// the caller decides whether that skips the file.
pub fn report_date_from_filename(filename: &str) -> Option<NaiveDate> {
    let stem = Path::new(filename).file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
