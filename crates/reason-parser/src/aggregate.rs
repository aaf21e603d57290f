use std::sync::LazyLock;

use analysis_core::{max_or_none, min_or_none, SelectionReasons, StockRecord};
use regex::Regex;
use serde::Serialize;

use crate::extract::{extract_value, parse_float_prefix, BOX_RANGE_KEY, MA_DIFF_KEY, VOLATILITY_KEY};

static DRAWDOWN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"从高点下跌([0-9.]+)%").unwrap());
static RAPID_DECLINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"快速下跌[：:]?\s*([0-9.]+)%").unwrap());

/// Substring marking a low-position clause
pub const LOW_POSITION_MARKER: &str = "低位";
/// Substring marking a rapid-decline clause
pub const RAPID_DECLINE_MARKER: &str = "快速下跌";

/// `<key>` value of every window; unparseable captures are dropped.
fn keyed_values<'a>(reasons: &'a SelectionReasons, key: &'a str) -> impl Iterator<Item = f64> + 'a {
    reasons
        .reasons()
        .filter_map(move |reason| extract_value(reason, key))
        .filter(|v| !v.is_nan())
}

fn percent_values<'a>(reasons: &'a SelectionReasons, pattern: &'a Regex) -> impl Iterator<Item = f64> + 'a {
    reasons
        .reasons()
        .filter_map(move |reason| pattern.captures(reason))
        .filter_map(|caps| caps.get(1).map(|m| parse_float_prefix(m.as_str())))
        .filter(|v| !v.is_nan())
}

/// Tightest box range over all windows.
pub fn extract_box_range(reasons: &SelectionReasons) -> Option<f64> {
    min_or_none(keyed_values(reasons, BOX_RANGE_KEY))
}

/// Tightest moving-average convergence over all windows.
pub fn extract_ma_diff(reasons: &SelectionReasons) -> Option<f64> {
    min_or_none(keyed_values(reasons, MA_DIFF_KEY))
}

/// Lowest volatility over all windows.
pub fn extract_volatility(reasons: &SelectionReasons) -> Option<f64> {
    min_or_none(keyed_values(reasons, VOLATILITY_KEY))
}

/// Largest drawdown from the high (`从高点下跌45.20%`), in percent.
pub fn extract_low_position_percent(reasons: &SelectionReasons) -> Option<f64> {
    max_or_none(percent_values(reasons, &DRAWDOWN_PATTERN))
}

/// Largest rapid decline (`快速下跌: 18.50%`), in percent.
pub fn extract_rapid_decline_percent(reasons: &SelectionReasons) -> Option<f64> {
    max_or_none(percent_values(reasons, &RAPID_DECLINE_PATTERN))
}

/// Whether any window mentions a low position.
pub fn extract_is_low_position(reasons: &SelectionReasons) -> bool {
    reasons.reasons().any(|r| r.contains(LOW_POSITION_MARKER))
}

/// Whether any window mentions a rapid decline.
pub fn extract_has_rapid_decline(reasons: &SelectionReasons) -> bool {
    reasons.reasons().any(|r| r.contains(RAPID_DECLINE_MARKER))
}

/// All reason-derived metrics of one stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReasonMetrics {
    pub box_range: Option<f64>,
    pub ma_diff: Option<f64>,
    pub volatility: Option<f64>,
    pub low_position_percent: Option<f64>,
    pub rapid_decline_percent: Option<f64>,
    pub is_low_position: bool,
    pub has_rapid_decline: bool,
}

impl ReasonMetrics {
    pub fn from_reasons(reasons: &SelectionReasons) -> Self {
        Self {
            box_range: extract_box_range(reasons),
            ma_diff: extract_ma_diff(reasons),
            volatility: extract_volatility(reasons),
            low_position_percent: extract_low_position_percent(reasons),
            rapid_decline_percent: extract_rapid_decline_percent(reasons),
            is_low_position: extract_is_low_position(reasons),
            has_rapid_decline: extract_has_rapid_decline(reasons),
        }
    }

    /// Metrics of a stock; a stock without reasons has no values and no flags.
    pub fn from_stock(stock: &StockRecord) -> Self {
        stock
            .selection_reasons
            .as_ref()
            .map(Self::from_reasons)
            .unwrap_or_default()
    }
}
