use anyhow::{bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage:
  scan-export export <stocks.json> [--batch] [--out DIR] [--filename NAME] [--buy-date YYYY-MM-DD] [--sell-date YYYY-MM-DD]
  scan-export derive <stocks.json>
  scan-export return-rate <records.json>
  scan-export scan-config [config.json]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Write the CSV export of a scan result
    Export {
        input: PathBuf,
        batch: bool,
        out: Option<PathBuf>,
        filename: Option<String>,
        buy_date: Option<String>,
        sell_date: Option<String>,
    },
    /// Print every derived stock as JSON
    Derive { input: PathBuf },
    /// Print the overall return of saved backtest periods
    ReturnRate { input: PathBuf },
    /// Print the effective scan configuration
    ScanConfig { path: Option<PathBuf> },
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// First argument after the subcommand that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--batch" => {}
            a if a.starts_with("--") => {
                iter.next();
            }
            a => return Some(PathBuf::from(a)),
        }
    }
    None
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(subcommand) = args.first() else {
        bail!("missing command\n{}", USAGE);
    };

    let command = match subcommand.as_str() {
        "export" => {
            let Some(input) = positional(args) else {
                bail!("export needs a stocks file\n{}", USAGE);
            };
            Command::Export {
                input,
                batch: args.iter().any(|a| a == "--batch"),
                out: flag_value(args, "--out").map(PathBuf::from),
                filename: flag_value(args, "--filename"),
                buy_date: flag_value(args, "--buy-date"),
                sell_date: flag_value(args, "--sell-date"),
            }
        }
        "derive" => match positional(args) {
            Some(input) => Command::Derive { input },
            None => bail!("derive needs a stocks file\n{}", USAGE),
        },
        "return-rate" => match positional(args) {
            Some(input) => Command::ReturnRate { input },
            None => bail!("return-rate needs a records file\n{}", USAGE),
        },
        "scan-config" => Command::ScanConfig { path: positional(args) },
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    };
    Ok(command)
}
