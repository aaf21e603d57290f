//! Flattening a scan-engine stock into export cells.
//!
//! Each analysis block may be flat or keyed by window; the flat value is
//! preferred, otherwise the first window (levels) or the best window (box
//! quality) is used.

use analysis_core::{
    flag, js_number_string, max_or_none, to_fixed, Board, BoxAnalysis, PlatformWindows, PriceLevels,
    StockRecord, WindowedBlock,
};
use reason_parser::{
    extract_breakthrough_info, extract_low_position_info, extract_rapid_decline_info,
    extract_text_value, ReasonMetrics, DECLINE_PATTERN_KEY,
};
use serde::Serialize;
use technical_analysis::{calculate_percent_b_range, extract_percent_b, PercentBRange};

use crate::row::{ExportRow, TechnicalColumns, TurnoverColumns, VolumeColumns};

/// `value` to `digits` decimals, `""` when absent or not finite.
fn fixed(value: Option<f64>, digits: usize) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| to_fixed(v, digits))
        .unwrap_or_default()
}

fn opt_flag(value: Option<bool>) -> String {
    value.map(flag).unwrap_or_default()
}

/// Best box quality of the stock.
///
/// A flat `box_analysis.box_quality` wins even when it is null. Otherwise the
/// maximum over the `details` windows, reading both the nested
/// `box_analysis.box_quality` and the window's own `box_quality`. Without
/// `details`, the windows of a window-keyed `box_analysis` are scanned.
pub fn extract_box_quality(stock: &StockRecord) -> Option<f64> {
    if let Some(WindowedBlock::Flat(flat)) = &stock.box_analysis {
        if let Some(quality) = flat.box_quality {
            return quality;
        }
    }

    if let Some(details) = &stock.details {
        let qualities = details.values().flat_map(|window| {
            let nested = window
                .box_analysis
                .as_ref()
                .and_then(|b| b.box_quality.flatten());
            [nested, window.box_quality]
        });
        return max_or_none(qualities.flatten());
    }

    let windows = stock.box_analysis.as_ref()?.windows()?;
    max_or_none(windows.values().filter_map(|b| b.box_quality.flatten()))
}

/// Platform windows as an ascending comma-joined list.
pub fn extract_windows(stock: &StockRecord) -> String {
    match &stock.platform_windows {
        Some(PlatformWindows::Number(n)) if *n > 0.0 => js_number_string(*n),
        Some(PlatformWindows::Numbers(items)) => {
            let mut windows: Vec<f64> = items.iter().copied().filter(|w| *w > 0.0).collect();
            windows.sort_by(f64::total_cmp);
            windows
                .into_iter()
                .map(js_number_string)
                .collect::<Vec<_>>()
                .join(",")
        }
        Some(PlatformWindows::Text(text)) => text.clone(),
        _ => String::new(),
    }
}

/// Flat levels when set, else the first `details` window that has some.
fn find_levels(stock: &StockRecord, pick: fn(&BoxAnalysis) -> Option<&PriceLevels>) -> Option<&PriceLevels> {
    if let Some(WindowedBlock::Flat(flat)) = &stock.box_analysis {
        if let Some(levels) = pick(flat) {
            return Some(levels);
        }
    }
    stock
        .details
        .as_ref()?
        .values()
        .find_map(|window| window.box_analysis.as_ref().and_then(pick))
}

fn format_levels(levels: Option<&PriceLevels>, descending: bool) -> String {
    let mut levels: Vec<f64> = levels
        .map(PriceLevels::to_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(|l| l.is_finite())
        .collect();
    if descending {
        levels.sort_by(|a, b| b.total_cmp(a));
    } else {
        levels.sort_by(f64::total_cmp);
    }
    levels
        .into_iter()
        .map(|l| to_fixed(l, 2))
        .collect::<Vec<_>>()
        .join(",")
}

/// Support levels, highest first.
pub fn extract_support_levels(stock: &StockRecord) -> String {
    format_levels(find_levels(stock, |b| b.support_levels.as_ref()), true)
}

/// Resistance levels, lowest first.
pub fn extract_resistance_levels(stock: &StockRecord) -> String {
    format_levels(find_levels(stock, |b| b.resistance_levels.as_ref()), false)
}

pub fn extract_volume_columns(stock: &StockRecord) -> VolumeColumns {
    let Some(va) = stock.volume_analysis.as_ref().and_then(WindowedBlock::primary) else {
        return VolumeColumns::default();
    };
    let consolidation = va.consolidation_details.as_ref();
    let breakthrough = va.breakthrough_details.as_ref();

    VolumeColumns {
        has_consolidation: opt_flag(va.has_consolidation_volume),
        has_breakthrough: opt_flag(va.has_breakthrough),
        change_ratio: fixed(consolidation.and_then(|c| c.volume_change_ratio), 4),
        stability: fixed(consolidation.and_then(|c| c.volume_stability), 4),
        trend: fixed(consolidation.and_then(|c| c.volume_trend), 4),
        increase_ratio: fixed(breakthrough.and_then(|b| b.volume_increase_ratio), 4),
    }
}

pub fn extract_turnover_columns(stock: &StockRecord) -> TurnoverColumns {
    let Some(ta) = stock.turnover_analysis.as_ref().and_then(WindowedBlock::primary) else {
        return TurnoverColumns::default();
    };
    let details = ta.details.as_ref();

    TurnoverColumns {
        meets_criteria: opt_flag(ta.meets_criteria),
        avg_rate: fixed(
            ta.avg_turnover_rate.or_else(|| details.and_then(|d| d.avg_turnover_rate)),
            2,
        ),
        max_rate: fixed(details.and_then(|d| d.max_turnover_rate), 2),
        stability: fixed(details.and_then(|d| d.turnover_stability), 4),
        spike_count: details
            .and_then(|d| d.spike_count)
            .map(js_number_string)
            .unwrap_or_default(),
    }
}

pub fn extract_technical_columns(stock: &StockRecord) -> TechnicalColumns {
    let mut columns = TechnicalColumns::default();
    let Some(prediction) = stock.breakthrough_prediction.as_ref().and_then(WindowedBlock::primary) else {
        return columns;
    };

    if let Some(signals) = &prediction.signals {
        columns.macd_signal = flag(signals.macd);
        columns.rsi_signal = flag(signals.rsi);
        columns.kdj_signal = flag(signals.kdj);
        columns.bollinger_signal = flag(signals.bollinger);
    }

    if let Some(details) = &prediction.details {
        if let Some(macd) = &details.macd {
            columns.macd_value = fixed(macd.macd, 4);
            columns.macd_signal_value = fixed(macd.macd_signal, 4);
            columns.macd_hist = fixed(macd.macd_hist, 4);
        }
        if let Some(rsi) = &details.rsi {
            columns.rsi_value = fixed(rsi.current_rsi, 2);
        }
        if let Some(kdj) = &details.kdj {
            columns.k_value = fixed(kdj.current_k, 2);
            columns.d_value = fixed(kdj.current_d, 2);
            columns.j_value = fixed(kdj.current_j, 2);
        }
        if let Some(bb) = &details.bollinger {
            columns.bb_upper = fixed(bb.bb_upper, 2);
            columns.bb_middle = fixed(bb.bb_middle, 2);
            columns.bb_lower = fixed(bb.bb_lower, 2);
        }
    }
    columns
}

/// Export cells of one stock; the date columns are left empty.
pub fn convert_stock_to_export_row(stock: &StockRecord) -> ExportRow {
    ExportRow {
        code: stock.code.clone(),
        name: stock.name.clone(),
        buy_date: String::new(),
        sell_date: String::new(),
        windows: extract_windows(stock),
        box_quality: fixed(extract_box_quality(stock), 4),
        percent_b: fixed(extract_percent_b(stock), 4),
        support_levels: extract_support_levels(stock),
        resistance_levels: extract_resistance_levels(stock),
        industry: stock.industry.clone(),
        outperform_index: fixed(stock.outperform_index, 4),
        stock_return: fixed(stock.stock_return, 4),
        weighted_score: fixed(stock.weighted_score, 4),
        has_breakthrough: opt_flag(stock.has_breakthrough),
        has_breakthrough_confirmation: opt_flag(stock.has_breakthrough_confirmation),
        volume: extract_volume_columns(stock),
        turnover: extract_turnover_columns(stock),
        technical: extract_technical_columns(stock),
    }
}

/// Display notes read from one window's selection reason
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowNote {
    pub window: String,
    pub low_position: String,
    pub rapid_decline: String,
    pub breakthrough: String,
    pub pattern: String,
}

impl WindowNote {
    fn from_reason(window: &str, reason: &str) -> Self {
        Self {
            window: window.to_string(),
            low_position: extract_low_position_info(reason),
            rapid_decline: extract_rapid_decline_info(reason),
            breakthrough: extract_breakthrough_info(reason),
            pattern: extract_text_value(reason, DECLINE_PATTERN_KEY),
        }
    }
}

/// Everything derived for one stock: its export row plus the board, reason
/// metrics, per-window notes and %B relative to the rest of the batch.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedStock {
    pub row: ExportRow,
    pub board: Option<Board>,
    pub board_label: Option<&'static str>,
    pub reasons: ReasonMetrics,
    pub window_notes: Vec<WindowNote>,
    pub percent_b: Option<f64>,
    pub normalized_percent_b: Option<f64>,
}

impl DerivedStock {
    pub fn derive(stock: &StockRecord, range: &PercentBRange) -> Self {
        let board = Board::from_code(&stock.code);
        let percent_b = extract_percent_b(stock).filter(|v| v.is_finite());
        let window_notes = stock
            .selection_reasons
            .as_ref()
            .map(|reasons| {
                reasons
                    .iter()
                    .map(|(window, reason)| WindowNote::from_reason(window, reason))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            row: convert_stock_to_export_row(stock),
            board,
            board_label: board.map(|b| b.label()),
            reasons: ReasonMetrics::from_stock(stock),
            window_notes,
            percent_b,
            normalized_percent_b: percent_b.map(|v| range.normalize(v)),
        }
    }
}

/// Derive every stock of a batch; %B is normalized over the whole batch.
pub fn derive_stocks(stocks: &[StockRecord]) -> Vec<DerivedStock> {
    let range = calculate_percent_b_range(stocks);
    tracing::debug!(
        "%B range over {} stocks: {:.4}..{:.4}",
        stocks.len(),
        range.min_percent_b,
        range.max_percent_b
    );
    stocks.iter().map(|s| DerivedStock::derive(s, &range)).collect()
}
