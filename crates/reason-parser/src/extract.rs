use std::sync::LazyLock;

use regex::Regex;

/// Price range of the box (`价格区间0.20`)
pub const BOX_RANGE_KEY: &str = "价格区间";
/// Moving-average convergence (`均线收敛0.02`)
pub const MA_DIFF_KEY: &str = "均线收敛";
/// Volatility (`波动率0.03`)
pub const VOLATILITY_KEY: &str = "波动率";
/// Decline pattern note (`标准模式: 低位+快速下跌后形成平台期`)
pub const DECLINE_PATTERN_KEY: &str = "标准模式";
/// Weighted window score (`加权得分: 0.85`)
pub const WEIGHTED_SCORE_KEY: &str = "加权得分";

const NUMBER_CAPTURE: &str = "[0-9.]+";
const TEXT_CAPTURE: &str = "[^,，]+";

/// Precompiled numeric patterns for the well-known keys
static NUMBER_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    compile_all(&[BOX_RANGE_KEY, MA_DIFF_KEY, VOLATILITY_KEY, WEIGHTED_SCORE_KEY], NUMBER_CAPTURE)
});
static TEXT_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| compile_all(&[DECLINE_PATTERN_KEY], TEXT_CAPTURE));

/// Build `<key>[：:]?\s*(<capture>)` with the key taken literally.
fn keyed_pattern(key: &str, capture: &str) -> Option<Regex> {
    Regex::new(&format!(r"{}[：:]?\s*({})", regex::escape(key), capture)).ok()
}

fn compile_all(keys: &[&'static str], capture: &str) -> Vec<(&'static str, Regex)> {
    keys.iter()
        .filter_map(|key| keyed_pattern(key, capture).map(|re| (*key, re)))
        .collect()
}

fn keyed_capture<'a>(
    reason: &'a str,
    key: &str,
    capture: &str,
    cache: &[(&'static str, Regex)],
) -> Option<&'a str> {
    let compiled;
    let re = match cache.iter().find(|(cached, _)| *cached == key) {
        Some((_, re)) => re,
        None => {
            compiled = keyed_pattern(key, capture)?;
            &compiled
        }
    };
    re.captures(reason)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the longest numeric prefix of a `[0-9.]+` capture, the way
/// `parseFloat` does: `"1.2.3"` is 1.2, `"5."` is 5, a lone `"."` is NaN.
pub fn parse_float_prefix(text: &str) -> f64 {
    let end = text
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// First `<key>` number in `reason`.
///
/// `None` when the key does not occur. A capture that is not a number (only
/// dots) comes back as `Some(NaN)`; callers decide whether that counts as found.
pub fn extract_value(reason: &str, key: &str) -> Option<f64> {
    keyed_capture(reason, key, NUMBER_CAPTURE, &NUMBER_PATTERNS).map(parse_float_prefix)
}

/// Like [`extract_value`] but returns the raw number text, `""` when absent.
pub fn extract_value_text(reason: &str, key: &str) -> String {
    keyed_capture(reason, key, NUMBER_CAPTURE, &NUMBER_PATTERNS)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Text following `<key>` up to the next comma (ASCII or full-width),
/// trimmed; `""` when absent.
pub fn extract_text_value(reason: &str, key: &str) -> String {
    keyed_capture(reason, key, TEXT_CAPTURE, &TEXT_PATTERNS)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REASON: &str =
        "60日平台期: 价格区间0.18, 均线收敛：0.02, 波动率 0.03, 标准模式: 低位+快速下跌后形成平台期, 加权得分: 0.85";

    #[test]
    fn test_extract_value_separators() {
        assert_eq!(extract_value(REASON, BOX_RANGE_KEY), Some(0.18));
        assert_eq!(extract_value(REASON, MA_DIFF_KEY), Some(0.02));
        assert_eq!(extract_value(REASON, VOLATILITY_KEY), Some(0.03));
        assert_eq!(extract_value(REASON, WEIGHTED_SCORE_KEY), Some(0.85));
    }

    #[test]
    fn test_extract_value_missing_key() {
        assert_eq!(extract_value(REASON, "成交量突破"), None);
        assert_eq!(extract_value("", BOX_RANGE_KEY), None);
        assert_eq!(extract_value_text(REASON, "成交量突破"), "");
        assert_eq!(extract_text_value(REASON, "成交量突破"), "");
    }

    #[test]
    fn test_extract_value_takes_first_occurrence() {
        let reason = "价格区间0.30, 价格区间0.10";
        assert_eq!(extract_value(reason, BOX_RANGE_KEY), Some(0.30));
    }

    #[test]
    fn test_extract_value_unparseable_is_nan() {
        let value = extract_value("价格区间., 均线收敛0.02", BOX_RANGE_KEY).unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn test_extract_value_text() {
        assert_eq!(extract_value_text(REASON, BOX_RANGE_KEY), "0.18");
    }

    #[test]
    fn test_extract_text_value_stops_at_comma() {
        assert_eq!(extract_text_value(REASON, DECLINE_PATTERN_KEY), "低位+快速下跌后形成平台期");
        assert_eq!(extract_text_value("标准模式：甲，乙", DECLINE_PATTERN_KEY), "甲");
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("1.2.3"), 1.2);
        assert_eq!(parse_float_prefix("5."), 5.0);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert!(parse_float_prefix(".").is_nan());
        assert!(parse_float_prefix("..").is_nan());
    }

    #[test]
    fn test_known_keys_are_precompiled() {
        let numeric: Vec<&str> = NUMBER_PATTERNS.iter().map(|(key, _)| *key).collect();
        assert_eq!(numeric, [BOX_RANGE_KEY, MA_DIFF_KEY, VOLATILITY_KEY, WEIGHTED_SCORE_KEY]);
        assert_eq!(TEXT_PATTERNS.len(), 1);

        // cached and ad-hoc patterns agree
        let cached = extract_value(REASON, VOLATILITY_KEY);
        let adhoc = keyed_pattern(VOLATILITY_KEY, NUMBER_CAPTURE)
            .and_then(|re| re.captures(REASON))
            .and_then(|caps| caps.get(1))
            .map(|m| parse_float_prefix(m.as_str()));
        assert_eq!(cached, adhoc);
    }

    #[test]
    fn test_key_is_literal() {
        assert_eq!(extract_value("a.b 1.5", "a.b"), Some(1.5));
        assert_eq!(extract_value("axb 1.5", "a.b"), None);
    }
}
