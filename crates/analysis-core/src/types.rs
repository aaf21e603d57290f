use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalysisError, CoreResult};
use crate::lenient;
use crate::shape::{truthy, WindowEntries, WindowedBlock};

/// Daily K-line bar as delivered with a scan result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bar {
    #[serde(default, alias = "day")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_str")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_str")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_str")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_str")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64_or_str")]
    pub volume: Option<f64>,
    /// Turnover rate (%)
    #[serde(default, deserialize_with = "lenient::opt_f64_or_str")]
    pub turn: Option<f64>,
}

/// Support or resistance levels: one price or a list of prices.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceLevels {
    Single(f64),
    Many(Vec<f64>),
    /// Present and truthy, but neither a number nor a list
    Unusable,
}

impl PriceLevels {
    /// Falsy values (null, 0, "", false) read as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !truthy(value) {
            return None;
        }
        Some(match value {
            Value::Number(n) => n.as_f64().map(PriceLevels::Single).unwrap_or(PriceLevels::Unusable),
            Value::Array(items) => PriceLevels::Many(items.iter().filter_map(Value::as_f64).collect()),
            _ => PriceLevels::Unusable,
        })
    }

    /// Numeric levels in their given order.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            PriceLevels::Single(level) => vec![*level],
            PriceLevels::Many(levels) => levels.clone(),
            PriceLevels::Unusable => Vec::new(),
        }
    }
}

fn opt_levels<'de, D>(deserializer: D) -> Result<Option<PriceLevels>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(PriceLevels::from_value(&value))
}

/// Price-box analysis of a platform period
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoxAnalysis {
    /// `Some(None)` when the key is present but null or not a number
    #[serde(default, deserialize_with = "lenient::present_f64")]
    pub box_quality: Option<Option<f64>>,
    #[serde(default, deserialize_with = "opt_levels")]
    pub support_levels: Option<PriceLevels>,
    #[serde(default, deserialize_with = "opt_levels")]
    pub resistance_levels: Option<PriceLevels>,
}

/// Per-window entry of `details`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowDetail {
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub box_analysis: Option<BoxAnalysis>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub box_quality: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsolidationDetails {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub volume_change_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub volume_stability: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub volume_trend: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeBreakthroughDetails {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub volume_increase_ratio: Option<f64>,
}

/// Volume behaviour inside the platform and at breakout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeAnalysis {
    #[serde(default, deserialize_with = "lenient::present_truthy")]
    pub has_consolidation_volume: Option<bool>,
    #[serde(default, deserialize_with = "lenient::present_truthy")]
    pub has_breakthrough: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub consolidation_details: Option<ConsolidationDetails>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub breakthrough_details: Option<VolumeBreakthroughDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnoverDetails {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_turnover_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub max_turnover_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub turnover_stability: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub spike_count: Option<f64>,
}

/// Turnover-rate check of the platform period
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnoverAnalysis {
    #[serde(default, deserialize_with = "lenient::present_truthy")]
    pub meets_criteria: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_turnover_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub details: Option<TurnoverDetails>,
}

/// Which technical indicators fired a breakout signal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakthroughSignals {
    #[serde(default, rename = "MACD", deserialize_with = "lenient::truthy_flag")]
    pub macd: bool,
    #[serde(default, rename = "RSI", deserialize_with = "lenient::truthy_flag")]
    pub rsi: bool,
    #[serde(default, rename = "KDJ", deserialize_with = "lenient::truthy_flag")]
    pub kdj: bool,
    #[serde(default, rename = "布林带", deserialize_with = "lenient::truthy_flag")]
    pub bollinger: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MacdDetail {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub macd: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub macd_signal: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub macd_hist: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RsiDetail {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub current_rsi: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KdjDetail {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub current_k: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub current_d: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub current_j: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BollingerDetail {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub bb_upper: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub bb_middle: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub bb_lower: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicatorDetails {
    #[serde(default, rename = "MACD", deserialize_with = "lenient::opt_object")]
    pub macd: Option<MacdDetail>,
    #[serde(default, rename = "RSI", deserialize_with = "lenient::opt_object")]
    pub rsi: Option<RsiDetail>,
    #[serde(default, rename = "KDJ", deserialize_with = "lenient::opt_object")]
    pub kdj: Option<KdjDetail>,
    #[serde(default, rename = "布林带", deserialize_with = "lenient::opt_object")]
    pub bollinger: Option<BollingerDetail>,
}

/// Breakout precursor prediction from the scan engine
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakthroughPrediction {
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub signals: Option<BreakthroughSignals>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub details: Option<IndicatorDetails>,
}

/// Platform window lengths the stock qualified for.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformWindows {
    Number(f64),
    /// Numeric entries only; other entries are dropped on read
    Numbers(Vec<f64>),
    /// Already formatted by the producer
    Text(String),
}

fn opt_platform_windows<'de, D>(deserializer: D) -> Result<Option<PlatformWindows>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !truthy(&value) {
        return Ok(None);
    }
    Ok(match value {
        Value::Number(n) => n.as_f64().map(PlatformWindows::Number),
        Value::Array(items) => Some(PlatformWindows::Numbers(
            items.iter().filter_map(Value::as_f64).collect(),
        )),
        Value::String(s) => Some(PlatformWindows::Text(s)),
        _ => None,
    })
}

/// Window label → selection reason text. Non-string reasons are dropped on read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionReasons(Vec<(String, String)>);

impl SelectionReasons {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(w, r)| (w.as_str(), r.as_str()))
    }

    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, r)| r.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SelectionReasons {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn opt_selection_reasons<'de, D>(deserializer: D) -> Result<Option<SelectionReasons>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// One candidate stock from a scan, as produced by the scan engine
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockRecord {
    #[serde(default, deserialize_with = "lenient::display_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient::display_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::display_string")]
    pub industry: String,
    #[serde(default, deserialize_with = "lenient::opt_windowed")]
    pub box_analysis: Option<WindowedBlock<BoxAnalysis>>,
    #[serde(default, deserialize_with = "lenient::opt_windowed")]
    pub volume_analysis: Option<WindowedBlock<VolumeAnalysis>>,
    #[serde(default, deserialize_with = "lenient::opt_windowed")]
    pub turnover_analysis: Option<WindowedBlock<TurnoverAnalysis>>,
    #[serde(default, deserialize_with = "lenient::opt_windowed")]
    pub breakthrough_prediction: Option<WindowedBlock<BreakthroughPrediction>>,
    #[serde(default, deserialize_with = "lenient::opt_window_entries")]
    pub details: Option<WindowEntries<WindowDetail>>,
    #[serde(default, deserialize_with = "opt_platform_windows")]
    pub platform_windows: Option<PlatformWindows>,
    #[serde(default, deserialize_with = "lenient::opt_vec")]
    pub kline_data: Option<Vec<Bar>>,
    #[serde(default, deserialize_with = "opt_selection_reasons")]
    pub selection_reasons: Option<SelectionReasons>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub outperform_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub stock_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub weighted_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::non_null_truthy")]
    pub has_breakthrough: Option<bool>,
    #[serde(default, deserialize_with = "lenient::non_null_truthy")]
    pub has_breakthrough_confirmation: Option<bool>,
}

impl StockRecord {
    /// Finite closing prices of `kline_data`, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.kline_data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|bar| bar.close)
            .filter(|close| close.is_finite())
            .collect()
    }
}

/// Parse a scan result payload: a JSON array of stocks, or an object holding
/// that array under `stocks`, `data` or `result`. Entries that are not
/// objects are skipped.
pub fn parse_stock_records(json: &str) -> CoreResult<Vec<StockRecord>> {
    let payload: Value = serde_json::from_str(json)?;
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => ["stocks", "data", "result"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| AnalysisError::InvalidData("no stock array in payload".to_string()))?,
        _ => {
            return Err(AnalysisError::InvalidData(
                "expected a JSON array or object".to_string(),
            ))
        }
    };

    let total = items.len();
    let stocks: Vec<StockRecord> = items
        .into_iter()
        .filter(Value::is_object)
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()?;
    if stocks.len() < total {
        tracing::warn!("skipped {} non-object entries in stock payload", total - stocks.len());
    }
    Ok(stocks)
}
