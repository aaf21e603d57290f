//! CSV export of scan results.
//!
//! Stocks are flattened into [`ExportRow`]s by the derivation functions,
//! rendered as UTF-8 CSV and handed to an [`ExportSink`].

pub mod csv_writer;
pub mod dates;
pub mod derive;
pub mod error;
pub mod exporter;
pub mod filename;
pub mod row;
pub mod sink;

#[cfg(test)]
mod tests;

pub use csv_writer::{write_csv, BOM};
pub use dates::adjust_weekend_to_monday;
pub use derive::*;
pub use error::{ExportError, ExportResult};
pub use exporter::{export_stocks_to_csv, DateResolver, ExportOptions, ExportSummary};
pub use filename::{default_filename, resolve_filename, sanitize_filename};
pub use row::*;
pub use sink::{ExportSink, FileSink, MemorySink};
