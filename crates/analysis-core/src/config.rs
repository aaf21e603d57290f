use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, CoreResult};

/// Parameters of one platform scan.
///
/// Built once per scan invocation and passed by reference; never mutated
/// after construction. Missing keys in a JSON overlay keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Scan date (YYYY-MM-DD), today by default
    pub scan_date: String,

    // Windows
    #[serde(rename = "windowsInput")]
    pub windows_input: String,       // "30,60,90"
    pub expected_count: u32,         // 30

    // Price box
    pub box_threshold: f64,          // 0.3
    pub ma_diff_threshold: f64,      // 0.03
    pub volatility_threshold: f64,   // 0.03

    // Volume
    pub use_volume_analysis: bool,
    pub volume_change_threshold: f64,     // 0.5
    pub volume_stability_threshold: f64,  // 0.5
    pub volume_increase_threshold: f64,   // 1.5

    // Technical indicators
    pub use_technical_indicators: bool,
    pub use_breakthrough_prediction: bool,

    // Low position
    pub use_low_position: bool,
    pub high_point_lookback_days: u32,    // 365
    pub decline_period_days: u32,         // 180
    pub decline_threshold: f64,           // 0.3

    // Rapid decline
    pub use_rapid_decline_detection: bool,
    pub rapid_decline_days: u32,          // 30
    pub rapid_decline_threshold: f64,     // 0.15

    // Breakthrough confirmation
    pub use_breakthrough_confirmation: bool,
    pub breakthrough_confirmation_days: u32,

    // Box detection
    pub use_box_detection: bool,
    pub box_quality_threshold: f64,       // 0.94

    // Turnover after entering the platform
    pub max_turnover_rate: f64,           // 5.0 (%)
    pub allow_turnover_spikes: bool,

    // Relative strength
    pub check_relative_strength: bool,
    /// `None` computes and stores relative strength without filtering on it
    pub outperform_index_threshold: Option<f64>,

    // Fundamentals
    pub use_fundamental_filter: bool,
    pub revenue_growth_percentile: f64,
    pub profit_growth_percentile: f64,
    pub roe_percentile: f64,
    pub liability_percentile: f64,
    pub pe_percentile: f64,
    pub pb_percentile: f64,
    pub fundamental_years_to_check: u32,

    // Window weights
    pub use_window_weights: bool,
    pub window_weights: BTreeMap<String, f64>,

    // System
    pub use_scan_cache: bool,
    /// `None` or 0 scans the whole market
    pub max_stock_count: Option<u32>,
    pub use_local_database_first: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_date: Local::now().format("%Y-%m-%d").to_string(),
            windows_input: "30,60,90".to_string(),
            expected_count: 30,
            box_threshold: 0.3,
            ma_diff_threshold: 0.03,
            volatility_threshold: 0.03,
            use_volume_analysis: true,
            volume_change_threshold: 0.5,
            volume_stability_threshold: 0.5,
            volume_increase_threshold: 1.5,
            use_technical_indicators: false,
            use_breakthrough_prediction: true,
            use_low_position: true,
            high_point_lookback_days: 365,
            decline_period_days: 180,
            decline_threshold: 0.3,
            use_rapid_decline_detection: true,
            rapid_decline_days: 30,
            rapid_decline_threshold: 0.15,
            use_breakthrough_confirmation: true,
            breakthrough_confirmation_days: 1,
            use_box_detection: true,
            box_quality_threshold: 0.94,
            max_turnover_rate: 5.0,
            allow_turnover_spikes: true,
            check_relative_strength: true,
            outperform_index_threshold: None,
            use_fundamental_filter: false,
            revenue_growth_percentile: 0.3,
            profit_growth_percentile: 0.3,
            roe_percentile: 0.3,
            liability_percentile: 0.3,
            pe_percentile: 0.7,
            pb_percentile: 0.7,
            fundamental_years_to_check: 3,
            use_window_weights: true,
            window_weights: BTreeMap::new(),
            use_scan_cache: false,
            max_stock_count: None,
            use_local_database_first: true,
        }
    }
}

impl ScanConfig {
    /// Overlay a JSON document on the defaults.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: ScanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        tracing::info!("Loaded scan config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Window lengths from `windows_input`, ascending and de-duplicated.
    /// ASCII and full-width commas both separate entries; invalid entries are skipped.
    pub fn windows(&self) -> Vec<u32> {
        let mut windows: Vec<u32> = self
            .windows_input
            .split([',', '，'])
            .filter_map(|w| w.trim().parse::<u32>().ok())
            .filter(|w| *w > 0)
            .collect();
        windows.sort_unstable();
        windows.dedup();
        windows
    }

    /// Stock count limit; `None` means the full market.
    pub fn stock_limit(&self) -> Option<u32> {
        self.max_stock_count.filter(|n| *n > 0)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.windows().is_empty() {
            return Err(AnalysisError::Config(format!(
                "windowsInput has no valid window: {:?}",
                self.windows_input
            )));
        }
        let percentiles = [
            ("revenue_growth_percentile", self.revenue_growth_percentile),
            ("profit_growth_percentile", self.profit_growth_percentile),
            ("roe_percentile", self.roe_percentile),
            ("liability_percentile", self.liability_percentile),
            ("pe_percentile", self.pe_percentile),
            ("pb_percentile", self.pb_percentile),
        ];
        for (name, value) in percentiles {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::Config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.windows(), vec![30, 60, 90]);
        assert_eq!(config.box_quality_threshold, 0.94);
        assert_eq!(config.stock_limit(), None);
        assert_eq!(config.scan_date.len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlay_keeps_defaults() {
        let config = ScanConfig::from_json_str(
            r#"{"windowsInput": "90，30, x", "max_stock_count": 0, "decline_threshold": 0.4}"#,
        )
        .unwrap();
        assert_eq!(config.windows(), vec![30, 90]);
        assert_eq!(config.stock_limit(), None);
        assert_eq!(config.decline_threshold, 0.4);
        assert_eq!(config.rapid_decline_days, 30);
    }

    #[test]
    fn test_invalid_windows_rejected() {
        let err = ScanConfig::from_json_str(r#"{"windowsInput": "abc"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_percentile_out_of_range_rejected() {
        let err = ScanConfig::from_json_str(r#"{"pe_percentile": 1.5}"#).unwrap_err();
        assert!(err.to_string().contains("pe_percentile"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_stock_count": 500}}"#).unwrap();
        let config = ScanConfig::from_file(file.path()).unwrap();
        assert_eq!(config.stock_limit(), Some(500));
    }
}
