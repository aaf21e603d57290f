use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use analysis_core::{parse_stock_records, ScanConfig, StockRecord};
use backtest_engine::{calculate_total_return_rate, parse_backtest_records};
use stock_export::{derive_stocks, export_stocks_to_csv, ExportOptions, FileSink};

use crate::cli::Command;
use crate::settings::ExportSettings;

fn read_stocks(path: &Path) -> Result<Vec<StockRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let stocks = parse_stock_records(&json)
        .with_context(|| format!("failed to parse stocks from {}", path.display()))?;
    tracing::info!("Loaded {} stocks from {}", stocks.len(), path.display());
    Ok(stocks)
}

/// Run one command and return what it prints.
pub fn run(command: Command, settings: &ExportSettings) -> Result<String> {
    match command {
        Command::Export {
            input,
            batch,
            out,
            filename,
            buy_date,
            sell_date,
        } => {
            let stocks = read_stocks(&input)?;
            let batch = batch || settings.batch;

            let mut options = ExportOptions::default();
            if batch {
                options = options.with_buy_sell_dates();
            }
            if let Some(filename) = filename {
                options = options.with_filename(filename);
            }
            if let Some(date) = buy_date {
                options = options.with_buy_date(move |_, _| Some(date.clone()));
            }
            if let Some(date) = sell_date {
                options = options.with_sell_date(move |_, _| Some(date.clone()));
            }

            let mut sink = FileSink::new(out.unwrap_or_else(|| settings.output_dir.clone()));
            let summary = export_stocks_to_csv(&stocks, &options, &mut sink)
                .context("export failed")?;
            Ok(format!(
                "Exported {} stocks to {}",
                summary.count,
                sink.path_for(&summary.filename).display()
            ))
        }
        Command::Derive { input } => {
            let stocks = read_stocks(&input)?;
            let derived = derive_stocks(&stocks);
            Ok(serde_json::to_string_pretty(&derived)?)
        }
        Command::ReturnRate { input } => {
            let json = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let records = parse_backtest_records(&json)
                .with_context(|| format!("failed to parse backtest records from {}", input.display()))?;
            let summary = calculate_total_return_rate(&records);
            tracing::info!(
                "{} periods: return {:.2}% on {:.2}",
                records.len(),
                summary.total_return_rate,
                summary.total_investment
            );
            Ok(serde_json::to_string_pretty(&summary)?)
        }
        Command::ScanConfig { path } => {
            let config = match path {
                Some(path) => ScanConfig::from_file(&path)
                    .with_context(|| format!("invalid scan config {}", path.display()))?,
                None => ScanConfig::default(),
            };
            tracing::info!("Scan windows: {:?}", config.windows());
            Ok(serde_json::to_string_pretty(&config)?)
        }
    }
}
