//! Per-file record extraction and cross-file aggregation into the three
//! consolidated report views (ECL, EAD variation, LGD variation).

pub mod aggregate;
pub mod date;
pub mod extract;

pub use aggregate::{aggregate, ReportTables};
pub use extract::{extract, AuthRecord};
