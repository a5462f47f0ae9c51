use crate::error::{ensure_len, ensure_period, ensure_same_len, lookback, Result};
use crate::indicators::output::{FibonacciLevels, PriceLevel, SupportResistanceLevels};

/// Retracement levels measured down from `high` towards `low`.
pub fn calculate_fibonacci(high: f64, low: f64) -> FibonacciLevels {
    let diff = high - low;

    FibonacciLevels {
        level_0: high,
        level_236: high - diff * 0.236,
        level_382: high - diff * 0.382,
        level_500: high - diff * 0.5,
        level_618: high - diff * 0.618,
        level_786: high - diff * 0.786,
        level_100: low,
    }
}

/// Local extrema over a centered window of `2 * period + 1` bars.
///
/// Only bars with `period` bars on both sides are considered, so at least
/// `2 * period + 1` bars are needed. A bar can be both a support and a
/// resistance point.
pub fn calculate_support_resistance(highs: &[f64], lows: &[f64], period: usize) -> Result<SupportResistanceLevels> {
    ensure_period("SUPPORT_RESISTANCE", "period", period)?;
    ensure_same_len("SUPPORT_RESISTANCE", highs.len(), &[lows.len()])?;
    let required = lookback(
        "SUPPORT_RESISTANCE",
        period.checked_mul(2).and_then(|window| window.checked_add(1)),
    )?;
    ensure_len("SUPPORT_RESISTANCE", highs.len(), required)?;

    let mut levels = SupportResistanceLevels::default();

    for i in period..highs.len() - period {
        let window = (i - period)..=(i + period);

        if highs[window.clone()].iter().all(|&high| highs[i] >= high) {
            levels.resistance.push(PriceLevel { index: i, level: highs[i] });
        }
        if lows[window].iter().all(|&low| lows[i] <= low) {
            levels.support.push(PriceLevel { index: i, level: lows[i] });
        }
    }

    Ok(levels)
}
