use analysis_core::{parse_stock_records, StockRecord};
use chrono::NaiveDate;
use serde_json::json;

use crate::error::ExportError;
use crate::exporter::{export_stocks_to_csv, ExportOptions};
use crate::row::headers;
use crate::sink::{FileSink, MemorySink};

/// Helper: a stock from a JSON fixture.
fn stock(value: serde_json::Value) -> StockRecord {
    serde_json::from_value(value).unwrap()
}

/// Helper: the export date used in file names.
fn export_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

/// Helper: export into memory and return the CSV lines (BOM stripped).
fn export_lines(stocks: &[StockRecord], options: &ExportOptions) -> Vec<String> {
    let mut sink = MemorySink::new();
    export_stocks_to_csv(stocks, options, &mut sink).unwrap();
    sink.text()
        .unwrap()
        .split('\n')
        .map(str::to_string)
        .collect()
}

fn full_stock() -> StockRecord {
    stock(json!({
        "code": "sz.300001",
        "name": "特锐德",
        "industry": "电气设备",
        "platform_windows": [60, 30],
        "box_analysis": {"box_quality": 0.8123, "support_levels": [10.2, 10.8], "resistance_levels": 12.5},
        "volume_analysis": {"30": {"has_consolidation_volume": true, "has_breakthrough": false}},
        "turnover_analysis": {"meets_criteria": true, "avg_turnover_rate": 2.346, "details": {"spike_count": 1}},
        "breakthrough_prediction": {"signals": {"MACD": true}, "details": {"RSI": {"current_rsi": 61.2}}},
        "outperform_index": 0.5,
        "has_breakthrough": true
    }))
}

#[test]
fn test_export_no_stocks_is_no_data() {
    let mut sink = MemorySink::new();
    let result = export_stocks_to_csv(&[], &ExportOptions::default(), &mut sink);
    assert!(matches!(result, Err(ExportError::NoData)));
    assert!(sink.filename().is_none());
}

#[test]
fn test_export_single_bare_stock() {
    let options = ExportOptions::default().with_export_date(export_day());
    let lines = export_lines(&[stock(json!({"code": "sh.600000", "name": "浦发银行"}))], &options);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], headers(false).join(","));
    let cells: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(cells.len(), headers(false).len());
    assert_eq!(cells[0], "sh.600000");
    assert_eq!(cells[1], "浦发银行");
    assert!(cells[2..].iter().all(|c| c.is_empty()));
}

#[test]
fn test_export_summary_and_default_filename() {
    let options = ExportOptions::default().with_export_date(export_day());
    let mut sink = MemorySink::new();
    let summary = export_stocks_to_csv(&[full_stock(), full_stock()], &options, &mut sink).unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.filename, "平台股扫描结果_20240108.csv");
    assert_eq!(sink.filename(), Some("平台股扫描结果_20240108.csv"));
    assert!(sink.bytes().unwrap().starts_with("\u{feff}".as_bytes()));
}

#[test]
fn test_export_full_row() {
    let options = ExportOptions::default().with_export_date(export_day());
    let lines = export_lines(&[full_stock()], &options);
    assert_eq!(
        lines[1],
        r#"sz.300001,特锐德,"30,60",0.8123,,"10.80,10.20",12.50,电气设备,0.5000,,,1,,1,0,,,,,1,2.35,,,1,1,0,0,0,,,,61.20,,,,,,"#
    );
}

#[test]
fn test_export_batch_dates() {
    let stocks = vec![full_stock(), stock(json!({"code": "sh.688001"}))];
    let options = ExportOptions::default()
        .with_buy_sell_dates()
        .with_export_date(export_day())
        .with_buy_date(|_, index| Some(["2024-01-06", "2024-01-10"][index].to_string()))
        .with_sell_date(|stock, _| (stock.code == "sz.300001").then(|| "2024-01-20".to_string()));

    let mut sink = MemorySink::new();
    let summary = export_stocks_to_csv(&stocks, &options, &mut sink).unwrap();
    assert_eq!(summary.filename, "批量扫描结果_20240108.csv");

    let text = sink.text().unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert!(lines[0].starts_with("code,name,buy_date,sell_date,windows,"));
    // Saturday buy date moves to Monday
    assert!(lines[1].starts_with("sz.300001,特锐德,2024-01-08,2024-01-20,"));
    assert!(lines[2].starts_with("sh.688001,,2024-01-10,,"));
}

#[test]
fn test_dates_ignored_without_flag() {
    let options = ExportOptions::default()
        .with_export_date(export_day())
        .with_buy_date(|_, _| Some("2024-01-06".to_string()));
    let lines = export_lines(&[full_stock()], &options);
    assert!(!lines[0].contains("buy_date"));
    assert!(!lines[1].contains("2024-01-0"));
}

#[test]
fn test_custom_filename_is_sanitized() {
    let options = ExportOptions::default().with_filename(" scan:2024/01?.csv ");
    let mut sink = MemorySink::new();
    let summary = export_stocks_to_csv(&[full_stock()], &options, &mut sink).unwrap();
    assert_eq!(summary.filename, "scan_2024_01_.csv");
}

#[test]
fn test_export_to_file_sink() {
    let stocks = parse_stock_records(r#"[{"code": "sz.000001", "name": "a,\"b"}]"#).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(tmp.path());
    let options = ExportOptions::default().with_filename("out.csv");

    export_stocks_to_csv(&stocks, &options, &mut sink).unwrap();
    let written = std::fs::read_to_string(sink.path_for("out.csv")).unwrap();
    assert!(written.starts_with('\u{feff}'));
    assert!(written.contains(r#"sz.000001,"a,""b","#));
    assert!(!written.ends_with('\n'));
}
