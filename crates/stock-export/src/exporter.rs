use analysis_core::StockRecord;
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::csv_writer::write_csv;
use crate::dates::adjust_weekend_to_monday;
use crate::derive::convert_stock_to_export_row;
use crate::error::{ExportError, ExportResult};
use crate::filename::resolve_filename;
use crate::row::ExportRow;
use crate::sink::ExportSink;

/// Looks up a date for the stock at a position of the export.
pub type DateResolver = Box<dyn Fn(&StockRecord, usize) -> Option<String>>;

/// How a batch of stocks is exported
#[derive(Default)]
pub struct ExportOptions {
    /// Output name; a dated default is used when `None` or empty
    pub filename: Option<String>,
    /// Adds the `buy_date`/`sell_date` columns (batch-scan mode)
    pub include_buy_sell_dates: bool,
    pub get_buy_date: Option<DateResolver>,
    pub get_sell_date: Option<DateResolver>,
    /// Date used in the default filename; today when `None`
    pub export_date: Option<NaiveDate>,
}

impl ExportOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_buy_sell_dates(mut self) -> Self {
        self.include_buy_sell_dates = true;
        self
    }

    pub fn with_buy_date<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&StockRecord, usize) -> Option<String> + 'static,
    {
        self.get_buy_date = Some(Box::new(resolver));
        self
    }

    pub fn with_sell_date<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&StockRecord, usize) -> Option<String> + 'static,
    {
        self.get_sell_date = Some(Box::new(resolver));
        self
    }

    pub fn with_export_date(mut self, date: NaiveDate) -> Self {
        self.export_date = Some(date);
        self
    }

    fn row_for(&self, stock: &StockRecord, index: usize) -> ExportRow {
        let mut row = convert_stock_to_export_row(stock);
        if self.include_buy_sell_dates {
            if let Some(get_buy_date) = &self.get_buy_date {
                row.buy_date = get_buy_date(stock, index)
                    .map(|date| adjust_weekend_to_monday(&date))
                    .unwrap_or_default();
            }
            if let Some(get_sell_date) = &self.get_sell_date {
                row.sell_date = get_sell_date(stock, index).unwrap_or_default();
            }
        }
        row
    }
}

/// Outcome of a delivered export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub count: usize,
    pub filename: String,
}

/// Convert `stocks` to CSV and hand the file to `sink`.
pub fn export_stocks_to_csv(
    stocks: &[StockRecord],
    options: &ExportOptions,
    sink: &mut dyn ExportSink,
) -> ExportResult<ExportSummary> {
    if stocks.is_empty() {
        return Err(ExportError::NoData);
    }

    let rows: Vec<ExportRow> = stocks
        .iter()
        .enumerate()
        .map(|(index, stock)| options.row_for(stock, index))
        .collect();
    if rows.is_empty() {
        return Err(ExportError::NoData);
    }

    let bytes = write_csv(&rows, options.include_buy_sell_dates)?;
    let date = options
        .export_date
        .unwrap_or_else(|| Local::now().date_naive());
    let filename = resolve_filename(
        options.filename.as_deref(),
        options.include_buy_sell_dates,
        date,
    );

    sink.deliver(&filename, &bytes)?;
    tracing::info!("Exported {} stocks to {}", rows.len(), filename);

    Ok(ExportSummary {
        count: rows.len(),
        filename,
    })
}
