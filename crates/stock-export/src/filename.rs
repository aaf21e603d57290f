use chrono::NaiveDate;

/// Default name prefix of a single-scan export
pub const SINGLE_SCAN_PREFIX: &str = "平台股扫描结果";
/// Default name prefix of a batch-scan export
pub const BATCH_SCAN_PREFIX: &str = "批量扫描结果";

const ILLEGAL_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `{prefix}_{YYYYMMDD}.csv`
pub fn default_filename(batch: bool, date: NaiveDate) -> String {
    let prefix = if batch { BATCH_SCAN_PREFIX } else { SINGLE_SCAN_PREFIX };
    format!("{}_{}.csv", prefix, date.format("%Y%m%d"))
}

/// Replace characters that are illegal in common file systems with `_`, then trim.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect();
    cleaned.trim().to_string()
}

/// Final export filename: the given name (if non-empty) or the default, sanitized.
pub fn resolve_filename(given: Option<&str>, batch: bool, date: NaiveDate) -> String {
    match given.filter(|name| !name.is_empty()) {
        Some(name) => sanitize_filename(name),
        None => sanitize_filename(&default_filename(batch, date)),
    }
}
