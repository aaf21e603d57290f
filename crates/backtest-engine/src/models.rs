use analysis_core::lenient;
use analysis_core::{AnalysisError, CoreResult};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How capital is put to work across consecutive backtest periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyStrategy {
    /// Each period is topped back up to a fixed capital
    EqualDistributionFixed,
    /// Only the first period's principal; later periods reinvest the balance
    EqualDistribution,
    /// Any other strategy name; periods are independent
    Other(String),
}

impl BuyStrategy {
    pub fn from_name(name: &str) -> Self {
        match name {
            "equal_distribution_fixed" => BuyStrategy::EqualDistributionFixed,
            "equal_distribution" => BuyStrategy::EqualDistribution,
            other => BuyStrategy::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuyStrategy::EqualDistributionFixed => "equal_distribution_fixed",
            BuyStrategy::EqualDistribution => "equal_distribution",
            BuyStrategy::Other(name) => name,
        }
    }
}

/// Non-empty strategy names; anything else is no strategy.
fn opt_strategy<'de, D>(deserializer: D) -> Result<Option<BuyStrategy>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(name) if !name.is_empty() => Some(BuyStrategy::from_name(&name)),
        _ => None,
    })
}

/// Configuration a backtest period was run with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacktestConfig {
    /// Cut-off date of the scan the purchases are based on
    #[serde(default)]
    pub backtest_date: Option<String>,
    /// Date positions are valued at
    #[serde(default)]
    pub stat_date: Option<String>,
    #[serde(default, deserialize_with = "opt_strategy")]
    pub buy_strategy: Option<BuyStrategy>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub initial_capital: Option<f64>,
}

/// Period totals reported by the backtest run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestSummary {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_investment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_profit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_return_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_stocks: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacktestOutcome {
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub summary: Option<BacktestSummary>,
}

/// One saved backtest period.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacktestRecord {
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub config: Option<BacktestConfig>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub result: Option<BacktestOutcome>,
}

impl BacktestRecord {
    pub fn buy_strategy(&self) -> Option<&BuyStrategy> {
        self.config.as_ref()?.buy_strategy.as_ref()
    }

    pub fn initial_capital(&self) -> Option<f64> {
        self.config.as_ref()?.initial_capital
    }

    fn summary(&self) -> Option<&BacktestSummary> {
        self.result.as_ref()?.summary.as_ref()
    }

    /// Reported investment of the period; missing or non-numeric values count as 0.
    pub fn investment(&self) -> f64 {
        self.summary()
            .and_then(|s| s.total_investment)
            .filter(|v| !v.is_nan())
            .unwrap_or(0.0)
    }

    /// Reported profit of the period; missing values count as 0.
    pub fn profit(&self) -> f64 {
        self.summary()
            .and_then(|s| s.total_profit)
            .filter(|v| !v.is_nan())
            .unwrap_or(0.0)
    }
}

/// Overall result over a run of periods
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRateSummary {
    /// Percent
    pub total_return_rate: f64,
    pub total_investment: f64,
    pub total_profit: f64,
}

/// Parse saved backtest records: a JSON array of records or a single record.
/// Array entries that are not objects are skipped.
pub fn parse_backtest_records(json: &str) -> CoreResult<Vec<BacktestRecord>> {
    let payload: Value = serde_json::from_str(json)?;
    let items = match payload {
        Value::Array(items) => items,
        record @ Value::Object(_) => vec![record],
        _ => {
            return Err(AnalysisError::InvalidData(
                "expected a backtest record or an array of records".to_string(),
            ))
        }
    };

    let total = items.len();
    let records: Vec<BacktestRecord> = items
        .into_iter()
        .filter(Value::is_object)
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()?;
    if records.len() < total {
        tracing::warn!("skipped {} non-object backtest records", total - records.len());
    }
    Ok(records)
}
