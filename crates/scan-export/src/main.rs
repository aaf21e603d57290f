//! scan-export: derive, export and summarize platform scan results.
//!
//! Usage:
//!   cargo run -p scan-export -- export stocks.json --out exports
//!   cargo run -p scan-export -- export batch.json --batch --buy-date 2024-01-06
//!   cargo run -p scan-export -- derive stocks.json
//!   cargo run -p scan-export -- return-rate backtests.json
//!   cargo run -p scan-export -- scan-config config.json
//!
//! Defaults for the export directory and batch mode come from
//! `SCAN_EXPORT_OUTPUT_DIR` and `SCAN_EXPORT_BATCH` (a `.env` file is honoured).

mod cli;
mod commands;
mod settings;

use settings::ExportSettings;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scan_export=info,stock_export=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    let settings = ExportSettings::from_env()?;

    let output = commands::run(command, &settings)?;
    println!("{}", output);
    Ok(())
}
