use crate::models::{BacktestRecord, BuyStrategy, ReturnRateSummary};

/// Capital each `equal_distribution_fixed` period is topped up to when the
/// period's config does not name one
pub const DEFAULT_FIXED_CAPITAL: f64 = 100_000.0;

/// Combine consecutive backtest periods into one return figure.
///
/// The buy strategy is read from the first record and applied to all of them:
///
/// - `equal_distribution_fixed`: the first period's investment is the initial
///   principal. Every later period tops the running balance (principal plus
///   profit so far, including that period's own profit) back up to the fixed
///   capital; total investment is the principal plus all top-ups.
/// - `equal_distribution`: only the first period's investment counts.
/// - anything else: investments and profits are summed.
///
/// The rate is profit / investment × 100, or 0 without a positive investment.
pub fn calculate_total_return_rate(records: &[BacktestRecord]) -> ReturnRateSummary {
    let Some(first) = records.first() else {
        return ReturnRateSummary::default();
    };

    let (total_investment, total_profit) = match first.buy_strategy() {
        Some(BuyStrategy::EqualDistributionFixed) => fixed_capital_totals(records),
        Some(BuyStrategy::EqualDistribution) => (first.investment(), total_profit(records)),
        _ => (
            records.iter().map(BacktestRecord::investment).sum::<f64>(),
            total_profit(records),
        ),
    };

    let total_return_rate = if total_investment > 0.0 {
        total_profit / total_investment * 100.0
    } else {
        0.0
    };

    ReturnRateSummary {
        total_return_rate,
        total_investment,
        total_profit,
    }
}

fn total_profit(records: &[BacktestRecord]) -> f64 {
    records.iter().map(BacktestRecord::profit).sum()
}

fn fixed_capital_totals(records: &[BacktestRecord]) -> (f64, f64) {
    let mut principal = 0.0;
    let mut cumulative_profit = 0.0;

    for (index, record) in records.iter().enumerate() {
        cumulative_profit += record.profit();
        if index == 0 {
            principal = record.investment();
            continue;
        }

        let fixed_capital = record.initial_capital().unwrap_or(DEFAULT_FIXED_CAPITAL);
        let balance = principal + cumulative_profit;
        let top_up = (fixed_capital - balance).max(0.0);
        if top_up > 0.0 {
            tracing::debug!("period {}: topping up {:.2} to reach {:.2}", index, top_up, fixed_capital);
        }
        principal += top_up;
    }

    (principal, cumulative_profit)
}
