use serde::Serialize;

/// Header before the optional date columns
pub const ID_HEADERS: [&str; 2] = ["code", "name"];
/// Optional batch-scan columns
pub const DATE_HEADERS: [&str; 2] = ["buy_date", "sell_date"];
/// Derived metric columns, in export order
pub const METRIC_HEADERS: [&str; 36] = [
    "windows",
    "box_quality",
    "%B",
    "support_levels",
    "resistance_levels",
    "industry",
    "outperform_index",
    "stock_return",
    "weighted_score",
    "has_breakthrough",
    "has_breakthrough_confirmation",
    "volume_has_consolidation",
    "volume_has_breakthrough",
    "volume_change_ratio",
    "volume_stability",
    "volume_trend",
    "volume_increase_ratio",
    "turnover_meets_criteria",
    "turnover_avg_rate",
    "turnover_max_rate",
    "turnover_stability",
    "turnover_spike_count",
    "macd_signal",
    "rsi_signal",
    "kdj_signal",
    "bollinger_signal",
    "macd_value",
    "macd_signal_value",
    "macd_hist",
    "rsi_value",
    "k_value",
    "d_value",
    "j_value",
    "bb_upper",
    "bb_middle",
    "bb_lower",
];

/// Column names of an export, with or without the date columns.
pub fn headers(include_dates: bool) -> Vec<&'static str> {
    let mut headers = ID_HEADERS.to_vec();
    if include_dates {
        headers.extend(DATE_HEADERS);
    }
    headers.extend(METRIC_HEADERS);
    headers
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeColumns {
    pub has_consolidation: String,
    pub has_breakthrough: String,
    pub change_ratio: String,
    pub stability: String,
    pub trend: String,
    pub increase_ratio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnoverColumns {
    pub meets_criteria: String,
    pub avg_rate: String,
    pub max_rate: String,
    pub stability: String,
    pub spike_count: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TechnicalColumns {
    pub macd_signal: String,
    pub rsi_signal: String,
    pub kdj_signal: String,
    pub bollinger_signal: String,
    pub macd_value: String,
    pub macd_signal_value: String,
    pub macd_hist: String,
    pub rsi_value: String,
    pub k_value: String,
    pub d_value: String,
    pub j_value: String,
    pub bb_upper: String,
    pub bb_middle: String,
    pub bb_lower: String,
}

/// One exported stock. Every cell is a string; absent data is `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportRow {
    pub code: String,
    pub name: String,
    pub buy_date: String,
    pub sell_date: String,
    pub windows: String,
    pub box_quality: String,
    pub percent_b: String,
    pub support_levels: String,
    pub resistance_levels: String,
    pub industry: String,
    pub outperform_index: String,
    pub stock_return: String,
    pub weighted_score: String,
    pub has_breakthrough: String,
    pub has_breakthrough_confirmation: String,
    pub volume: VolumeColumns,
    pub turnover: TurnoverColumns,
    pub technical: TechnicalColumns,
}

impl ExportRow {
    /// Cells in header order.
    pub fn values(&self, include_dates: bool) -> Vec<&str> {
        let mut values = vec![self.code.as_str(), self.name.as_str()];
        if include_dates {
            values.extend([self.buy_date.as_str(), self.sell_date.as_str()]);
        }

        let v = &self.volume;
        let t = &self.turnover;
        let ti = &self.technical;
        let metrics: [&str; 36] = [
            &self.windows,
            &self.box_quality,
            &self.percent_b,
            &self.support_levels,
            &self.resistance_levels,
            &self.industry,
            &self.outperform_index,
            &self.stock_return,
            &self.weighted_score,
            &self.has_breakthrough,
            &self.has_breakthrough_confirmation,
            &v.has_consolidation,
            &v.has_breakthrough,
            &v.change_ratio,
            &v.stability,
            &v.trend,
            &v.increase_ratio,
            &t.meets_criteria,
            &t.avg_rate,
            &t.max_rate,
            &t.stability,
            &t.spike_count,
            &ti.macd_signal,
            &ti.rsi_signal,
            &ti.kdj_signal,
            &ti.bollinger_signal,
            &ti.macd_value,
            &ti.macd_signal_value,
            &ti.macd_hist,
            &ti.rsi_value,
            &ti.k_value,
            &ti.d_value,
            &ti.j_value,
            &ti.bb_upper,
            &ti.bb_middle,
            &ti.bb_lower,
        ];
        values.extend(metrics);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_exact() {
        let expected = "code,name,windows,box_quality,%B,support_levels,resistance_levels,industry,outperform_index,stock_return,weighted_score,has_breakthrough,has_breakthrough_confirmation,volume_has_consolidation,volume_has_breakthrough,volume_change_ratio,volume_stability,volume_trend,volume_increase_ratio,turnover_meets_criteria,turnover_avg_rate,turnover_max_rate,turnover_stability,turnover_spike_count,macd_signal,rsi_signal,kdj_signal,bollinger_signal,macd_value,macd_signal_value,macd_hist,rsi_value,k_value,d_value,j_value,bb_upper,bb_middle,bb_lower";
        assert_eq!(headers(false).join(","), expected);
    }

    #[test]
    fn test_headers_with_dates() {
        let h = headers(true);
        assert_eq!(&h[..4], &["code", "name", "buy_date", "sell_date"]);
        assert_eq!(h.len(), 40);
    }

    #[test]
    fn test_values_align_with_headers() {
        let row = ExportRow {
            code: "sz.000001".to_string(),
            windows: "30,60".to_string(),
            technical: TechnicalColumns { bb_lower: "9.80".to_string(), ..Default::default() },
            ..Default::default()
        };
        for include_dates in [false, true] {
            let values = row.values(include_dates);
            let h = headers(include_dates);
            assert_eq!(values.len(), h.len());
            let at = |name: &str| values[h.iter().position(|c| *c == name).unwrap()];
            assert_eq!(at("code"), "sz.000001");
            assert_eq!(at("windows"), "30,60");
            assert_eq!(at("bb_lower"), "9.80");
        }
    }
}
