use std::sync::LazyLock;

use regex::Regex;

static DRAWDOWN_INFO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"从高点下跌([0-9.]+)%").unwrap());
static HIGH_DATE_INFO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"高点日期([0-9-]+)").unwrap());
static RAPID_DECLINE_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"快速下跌[：:]?\s*([0-9.]+)%\s*\(([^)]+)\)").unwrap());
static BREAKTHROUGH_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"突破前兆[：:]?\s*([0-9]+)个指标\s*\(([^)]+)\)").unwrap());

fn group<'a>(caps: &regex::Captures<'a>, i: usize) -> &'a str {
    caps.get(i).map(|m| m.as_str()).unwrap_or_default()
}

/// Low-position summary for display, e.g. `从高点下跌45.20%，高点日期: 2023-02-10`.
pub fn extract_low_position_info(reason: &str) -> String {
    let mut parts = Vec::new();
    if let Some(caps) = DRAWDOWN_INFO.captures(reason) {
        parts.push(format!("从高点下跌{}%", group(&caps, 1)));
    }
    if let Some(caps) = HIGH_DATE_INFO.captures(reason) {
        parts.push(format!("高点日期: {}", group(&caps, 1)));
    }
    parts.join("，")
}

/// Rapid-decline summary, e.g. `18.50% (2023-06-01 至 2023-06-28)`.
pub fn extract_rapid_decline_info(reason: &str) -> String {
    RAPID_DECLINE_INFO
        .captures(reason)
        .map(|caps| format!("{}% ({})", group(&caps, 1), group(&caps, 2)))
        .unwrap_or_default()
}

/// Breakout precursor summary, e.g. `3个指标 (MACD, RSI, KDJ)`.
pub fn extract_breakthrough_info(reason: &str) -> String {
    BREAKTHROUGH_INFO
        .captures(reason)
        .map(|caps| format!("{}个指标 ({})", group(&caps, 1), group(&caps, 2)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_position_info() {
        let reason = "60日平台期: 价格区间0.18, 低位: 从高点下跌45.20%, 高点日期2023-02-10";
        assert_eq!(extract_low_position_info(reason), "从高点下跌45.20%，高点日期: 2023-02-10");
        assert_eq!(extract_low_position_info("高点日期2023-02-10"), "高点日期: 2023-02-10");
        assert_eq!(extract_low_position_info("价格区间0.18"), "");
    }

    #[test]
    fn test_rapid_decline_info() {
        let reason = "快速下跌: 18.50% (2023-06-01 至 2023-06-28), 标准模式: 低位+快速下跌后形成平台期";
        assert_eq!(extract_rapid_decline_info(reason), "18.50% (2023-06-01 至 2023-06-28)");
        assert_eq!(extract_rapid_decline_info("快速下跌: 18.50%"), "");
    }

    #[test]
    fn test_breakthrough_info() {
        let reason = "波动率0.02, 突破前兆: 3个指标 (MACD, RSI, 布林带)";
        assert_eq!(extract_breakthrough_info(reason), "3个指标 (MACD, RSI, 布林带)");
        assert_eq!(extract_breakthrough_info(""), "");
    }
}
