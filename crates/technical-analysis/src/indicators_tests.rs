#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use super::super::percent_b::*;
    use analysis_core::StockRecord;
    use approx::assert_relative_eq;
    use serde_json::json;

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // Helper function to build a stock whose kline_data carries `closes`
    fn stock_with_closes(code: &str, closes: &[f64]) -> StockRecord {
        let bars: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, c)| json!({"date": format!("2024-01-{:02}", i + 1), "close": c}))
            .collect();
        serde_json::from_value(json!({"code": code, "kline_data": bars})).unwrap()
    }

    fn one_to_twenty() -> Vec<f64> {
        (1..=20).map(|i| i as f64).collect()
    }

    #[test]
    fn test_latest_bollinger_ordering() {
        let band = latest_bollinger(&sample_prices(), 10, 2.0).unwrap();

        // Upper band should be above middle, middle above lower
        assert!(band.upper > band.middle);
        assert!(band.middle > band.lower);
    }

    #[test]
    fn test_latest_bollinger_uses_sample_std() {
        let band = latest_bollinger(&one_to_twenty(), 20, 2.0).unwrap();
        // sum of squared deviations of 1..=20 is 665; 665 / 19 = 35
        let std = 35.0f64.sqrt();

        assert_relative_eq!(band.middle, 10.5);
        assert_relative_eq!(band.upper, 10.5 + 2.0 * std, epsilon = 1e-12);
        assert_relative_eq!(band.lower, 10.5 - 2.0 * std, epsilon = 1e-12);
    }

    #[test]
    fn test_latest_bollinger_uses_last_window() {
        let mut data = vec![1000.0; 5];
        data.extend(one_to_twenty());
        let band = latest_bollinger(&data, 20, 2.0).unwrap();
        assert_relative_eq!(band.middle, 10.5);
    }

    #[test]
    fn test_latest_bollinger_insufficient_data() {
        assert!(latest_bollinger(&[1.0; 19], 20, 2.0).is_none());
        assert!(percent_b(&[1.0; 19]).is_none());
        assert!(percent_b(&[]).is_none());
    }

    #[test]
    fn test_percent_b_flat_prices_is_midpoint() {
        // Non-integer prices whose mean does not divide evenly
        for price in [12.34, 0.1, 3.3, 7.77, 10.0] {
            let closes = vec![price; 20];
            let band = latest_bollinger(&closes, 20, 2.0).unwrap();

            assert_eq!(band.width(), 0.0);
            assert_eq!(percent_b(&closes), Some(0.5));
        }
    }

    #[test]
    fn test_percent_b_flat_tail_after_movement() {
        let mut closes = one_to_twenty();
        closes.extend(vec![3.3; 20]);
        assert_eq!(percent_b(&closes), Some(0.5));
    }

    #[test]
    fn test_percent_b_rising_prices() {
        let std = 35.0f64.sqrt();
        let expected = (20.0 - (10.5 - 2.0 * std)) / (4.0 * std);

        assert_relative_eq!(percent_b(&one_to_twenty()).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_percent_b_bounds() {
        let band = BollingerBand { upper: 12.0, middle: 10.0, lower: 8.0 };
        assert_eq!(band.percent_b(8.0), 0.0);
        assert_eq!(band.percent_b(12.0), 1.0);
        assert_eq!(band.percent_b(10.0), 0.5);
        assert!(band.percent_b(13.0) > 1.0);
    }

    #[test]
    fn test_extract_percent_b_from_stock() {
        let stock = stock_with_closes("sz.000001", &one_to_twenty());
        assert!(extract_percent_b(&stock).unwrap() > 0.9);

        let short = stock_with_closes("sz.000002", &[10.0, 11.0]);
        assert_eq!(extract_percent_b(&short), None);
        assert_eq!(extract_percent_b(&StockRecord::default()), None);
    }

    #[test]
    fn test_percent_b_range_empty() {
        let range = calculate_percent_b_range(&[]);
        assert_eq!(range, PercentBRange { min_percent_b: 0.0, max_percent_b: 1.0 });
    }

    #[test]
    fn test_percent_b_range_ignores_stocks_without_klines() {
        let stocks = vec![StockRecord::default(), stock_with_closes("a", &[1.0, 2.0])];
        assert_eq!(calculate_percent_b_range(&stocks), PercentBRange::default());
    }

    #[test]
    fn test_percent_b_range_over_batch() {
        let mut falling = one_to_twenty();
        falling.reverse();
        let stocks = vec![
            stock_with_closes("up", &one_to_twenty()),
            stock_with_closes("flat", &[5.0; 20]),
            stock_with_closes("down", &falling),
            StockRecord::default(),
        ];
        let range = calculate_percent_b_range(&stocks);
        let up = percent_b(&one_to_twenty()).unwrap();

        assert_relative_eq!(range.max_percent_b, up, epsilon = 1e-12);
        assert_relative_eq!(range.min_percent_b, 1.0 - up, epsilon = 1e-12);
    }

    #[test]
    fn test_percent_b_range_serializes_camel_case() {
        let value = serde_json::to_value(PercentBRange::default()).unwrap();
        assert_eq!(value, json!({"minPercentB": 0.0, "maxPercentB": 1.0}));
    }

    #[test]
    fn test_normalize() {
        let range = PercentBRange { min_percent_b: 0.2, max_percent_b: 0.8 };
        assert_relative_eq!(range.normalize(0.5), 0.5);
        assert_relative_eq!(range.normalize(0.2), 0.0);

        let point = PercentBRange { min_percent_b: 0.4, max_percent_b: 0.4 };
        assert_eq!(point.normalize(0.4), 0.5);
    }
}
