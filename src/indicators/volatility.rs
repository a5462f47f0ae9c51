use crate::error::{ensure_len, ensure_period, ensure_same_len, lookback, IndicatorError, Result};
use crate::indicators::output::{BollingerOutput, Series};
use crate::indicators::trend::calculate_sma;

/// True range for every bar after the first.
///
/// TR = max(high - low, |high - prev_close|, |low - prev_close|), so the
/// result holds `len - 1` values and starts at input index 1.
pub fn calculate_true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Result<Vec<f64>> {
    ensure_same_len("TRUE_RANGE", highs.len(), &[lows.len(), closes.len()])?;
    ensure_len("TRUE_RANGE", highs.len(), 2)?;

    let results = (1..highs.len())
        .map(|i| {
            let range1 = highs[i] - lows[i];
            let range2 = (highs[i] - closes[i - 1]).abs();
            let range3 = (lows[i] - closes[i - 1]).abs();
            range1.max(range2).max(range3)
        })
        .collect();

    Ok(results)
}

// Calculate Bollinger Bands
pub fn calculate_bollinger_bands(
    prices: &[f64],
    period: usize,
    deviation_multiplier: f64,
) -> Result<BollingerOutput> {
    ensure_period("BOLLINGER", "period", period)?;
    if !(deviation_multiplier >= 0.0 && deviation_multiplier.is_finite()) {
        return Err(IndicatorError::InvalidParameter {
            indicator: "BOLLINGER",
            reason: format!(
                "deviation multiplier must be a non-negative number, got {}",
                deviation_multiplier
            ),
        });
    }
    ensure_len("BOLLINGER", prices.len(), period)?;

    let middle = calculate_sma(prices, period)?;
    let mut upper_band = Vec::with_capacity(middle.len());
    let mut lower_band = Vec::with_capacity(middle.len());

    for (window, &mean) in prices.windows(period).zip(&middle.values) {
        // Population standard deviation of the window
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let half_width = deviation_multiplier * variance.sqrt();

        upper_band.push(mean + half_width);
        lower_band.push(mean - half_width);
    }

    Ok(BollingerOutput {
        offset: middle.offset,
        upper_band,
        middle_band: middle.values,
        lower_band,
    })
}

/// Average true range.
///
/// The first value is the plain mean of the first `period` true ranges;
/// later values use Wilder's smoothing. Needs `period + 1` bars and yields
/// `len - period` values starting at input index `period`.
pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<Series> {
    ensure_period("ATR", "period", period)?;
    ensure_same_len("ATR", highs.len(), &[lows.len(), closes.len()])?;
    let required = lookback("ATR", period.checked_add(1))?;
    ensure_len("ATR", highs.len(), required)?;

    let true_ranges = calculate_true_range(highs, lows, closes)?;
    let period_f = period as f64;

    let mut atr = true_ranges[..period].iter().sum::<f64>() / period_f;
    let mut results = Vec::with_capacity(true_ranges.len() - period + 1);
    results.push(atr);

    for tr in &true_ranges[period..] {
        // ATR = (prev_ATR * (period-1) + TR) / period
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        results.push(atr);
    }

    Ok(Series::new(period, results))
}
