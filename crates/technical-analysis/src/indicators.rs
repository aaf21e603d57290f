use analysis_core::{mean, sample_std_dev};

/// Bollinger look-back used for %B
pub const BOLLINGER_PERIOD: usize = 20;
/// Band half-width in standard deviations
pub const BOLLINGER_STD_DEV: f64 = 2.0;

/// Bands at the last bar only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBand {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Position of `price` within the band: 0 at the lower band, 1 at the
    /// upper band. A zero-width band puts every price at the midpoint, 0.5.
    pub fn percent_b(&self, price: f64) -> f64 {
        let width = self.width();
        if width == 0.0 {
            return 0.5;
        }
        (price - self.lower) / width
    }
}

/// Bollinger band of the last `period` values; `None` with fewer values.
///
/// Width uses the sample standard deviation (divisor `period - 1`).
pub fn latest_bollinger(data: &[f64], period: usize, std_dev: f64) -> Option<BollingerBand> {
    if period < 2 || data.len() < period {
        return None;
    }
    let window = &data[data.len() - period..];
    let middle = mean(window);
    let std = sample_std_dev(window);
    Some(BollingerBand {
        upper: middle + std_dev * std,
        middle,
        lower: middle - std_dev * std,
    })
}

/// %B of the last close against the 20-period, 2-sigma band.
pub fn percent_b(closes: &[f64]) -> Option<f64> {
    let band = latest_bollinger(closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV)?;
    let last = *closes.last()?;
    Some(band.percent_b(last))
}
