//! Small numeric helpers shared by the indicator and reason-parsing crates.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation (divisor `n - 1`).
///
/// Deviations are taken on values shifted by the first element, so a
/// constant series gives exactly 0.
pub fn sample_std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let origin = data[0];
    let shifted: Vec<f64> = data.iter().map(|x| x - origin).collect();
    let m = mean(&shifted);
    let variance = shifted.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Fold `values` with `pick`, or `None` when there is nothing to fold.
pub fn reduce_or_none<I>(values: I, pick: fn(f64, f64) -> f64) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().reduce(pick)
}

pub fn min_or_none<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    reduce_or_none(values, f64::min)
}

pub fn max_or_none<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    reduce_or_none(values, f64::max)
}
