use analysis_core::{max_or_none, min_or_none, StockRecord};
use serde::{Deserialize, Serialize};

use crate::indicators::percent_b;

/// %B of a stock's latest close, from its `kline_data`.
pub fn extract_percent_b(stock: &StockRecord) -> Option<f64> {
    percent_b(&stock.closes())
}

/// Spread of %B across a batch of stocks, used to normalize %B for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentBRange {
    pub min_percent_b: f64,
    pub max_percent_b: f64,
}

impl Default for PercentBRange {
    /// The nominal band, lower to upper
    fn default() -> Self {
        Self { min_percent_b: 0.0, max_percent_b: 1.0 }
    }
}

impl PercentBRange {
    pub fn width(&self) -> f64 {
        self.max_percent_b - self.min_percent_b
    }

    /// Map `value` onto 0..1 within the range; a zero-width range maps to 0.5.
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.width();
        if width == 0.0 {
            return 0.5;
        }
        (value - self.min_percent_b) / width
    }
}

/// Min and max %B over the stocks that have one; `{0, 1}` when none do.
pub fn calculate_percent_b_range(stocks: &[StockRecord]) -> PercentBRange {
    let values: Vec<f64> = stocks
        .iter()
        .filter_map(extract_percent_b)
        .filter(|v| v.is_finite())
        .collect();

    match (min_or_none(values.iter().copied()), max_or_none(values.iter().copied())) {
        (Some(min_percent_b), Some(max_percent_b)) => PercentBRange { min_percent_b, max_percent_b },
        _ => {
            tracing::debug!("no stock has enough closes for %B, using default range");
            PercentBRange::default()
        }
    }
}
