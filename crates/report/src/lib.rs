//! The repository report: the comma-delimited file the three workflows pass
//! from one stage to the next.
//!
//! ## Contract
//!
//! - UTF-8, header row plus one row per repository.
//! - The collector writes the columns in [`columns::COLLECTOR`]; later stages
//!   only ever *append* columns ([`columns::REMEDIATION`],
//!   [`columns::PROTECTION_NEWLY_ADDED`]). Existing columns, including ones
//!   this crate does not know about, are preserved in place.
//! - Column names match byte-for-byte between producer and consumer.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`table`] | [`ReportTable`]: ordered header + rows, CSV read / atomic write |
//! | [`columns`] | Exact column names |
//! | [`records`] | Mapping between rows and [`policy`] types |

pub mod columns;
pub mod records;
pub mod table;

pub use records::{
    collector_table, facts_from_row, record_to_row, write_protection_result,
    write_remediation_outcome,
};
pub use table::ReportTable;

use thiserror::Error;

/// Errors reading or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Report is missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

/// Convenience `Result` alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
