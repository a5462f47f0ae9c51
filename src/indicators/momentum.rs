use crate::error::{ensure_len, ensure_period, ensure_same_len, lookback, IndicatorError, Result};
use crate::indicators::output::{MacdOutput, Series, StochasticOutput};
use crate::indicators::trend::{calculate_ema_seeded, calculate_sma, EmaSeed};
use crate::models::typical_prices;

/// Lambert's scaling constant.
const CCI_CONSTANT: f64 = 0.015;

/// Relative strength index with Wilder's smoothing.
///
/// Average gain and loss are seeded with the plain mean of the first
/// `period` price changes. Needs `period + 1` prices and yields
/// `len - period` values starting at input index `period`.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Result<Series> {
    ensure_period("RSI", "period", period)?;
    let required = lookback("RSI", period.checked_add(1))?;
    ensure_len("RSI", prices.len(), required)?;

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|pair| {
            let change = pair[1] - pair[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let period_f = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period_f;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period_f;

    let mut results = Vec::with_capacity(gains.len() - period + 1);
    results.push(rsi_value(avg_gain, avg_loss));

    for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
        results.push(rsi_value(avg_gain, avg_loss));
    }

    Ok(Series::new(period, results))
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

// Calculate MACD with first-value seeded EMAs
pub fn calculate_macd(prices: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> Result<MacdOutput> {
    calculate_macd_seeded(prices, fast_period, slow_period, signal_period, EmaSeed::FirstValue)
}

/// MACD line, signal line and histogram, all truncated to the signal
/// line's length so index `i` of each refers to the same bar.
pub fn calculate_macd_seeded(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    seed: EmaSeed,
) -> Result<MacdOutput> {
    ensure_period("MACD", "fast period", fast_period)?;
    ensure_period("MACD", "slow period", slow_period)?;
    ensure_period("MACD", "signal period", signal_period)?;
    if fast_period >= slow_period {
        return Err(IndicatorError::InvalidParameter {
            indicator: "MACD",
            reason: format!(
                "fast period ({}) must be less than slow period ({})",
                fast_period, slow_period
            ),
        });
    }
    let required = lookback("MACD", slow_period.checked_add(signal_period - 1))?;
    ensure_len("MACD", prices.len(), required)?;

    let fast_ema = calculate_ema_seeded(prices, fast_period, seed)?.values;
    let slow_ema = calculate_ema_seeded(prices, slow_period, seed)?.values;

    // fast EMA starts (slow - fast) bars before the slow EMA
    let start_index = slow_period - fast_period;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(i, slow)| fast_ema[i + start_index] - slow)
        .collect();

    let signal_line = calculate_ema_seeded(&macd_line, signal_period, seed)?.values;
    let signal_start = macd_line.len() - signal_line.len();
    let macd_line = macd_line[signal_start..].to_vec();

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(macd, signal)| macd - signal)
        .collect();

    Ok(MacdOutput {
        offset: slow_period - 1 + signal_start,
        macd_line,
        signal_line,
        histogram,
    })
}

fn highest(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn lowest(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Highest high and lowest low of every `period`-bar window.
fn window_extremes<'a>(
    highs: &'a [f64],
    lows: &'a [f64],
    period: usize,
) -> impl Iterator<Item = (f64, f64)> + 'a {
    highs
        .windows(period)
        .zip(lows.windows(period))
        .map(|(high_window, low_window)| (highest(high_window), lowest(low_window)))
}

/// Stochastic oscillator. `%K` is truncated to the length of `%D`.
pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> Result<StochasticOutput> {
    ensure_period("STOCHASTIC", "%K period", k_period)?;
    ensure_period("STOCHASTIC", "%D period", d_period)?;
    ensure_same_len("STOCHASTIC", highs.len(), &[lows.len(), closes.len()])?;
    let required = lookback("STOCHASTIC", k_period.checked_add(d_period - 1))?;
    ensure_len("STOCHASTIC", highs.len(), required)?;

    let k_values: Vec<f64> = window_extremes(highs, lows, k_period)
        .zip(&closes[k_period - 1..])
        .map(|((highest_high, lowest_low), close)| {
            if highest_high == lowest_low {
                0.0
            } else {
                (close - lowest_low) / (highest_high - lowest_low) * 100.0
            }
        })
        .collect();

    let d_percent = calculate_sma(&k_values, d_period)?;

    Ok(StochasticOutput {
        offset: k_period - 1 + d_percent.offset,
        k_percent: k_values[d_percent.offset..].to_vec(),
        d_percent: d_percent.values,
    })
}

/// Williams %R in `[-100, 0]`; 0 when the window has no range.
pub fn calculate_williams_r(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<Series> {
    ensure_period("WILLIAMS_R", "period", period)?;
    ensure_same_len("WILLIAMS_R", highs.len(), &[lows.len(), closes.len()])?;
    ensure_len("WILLIAMS_R", highs.len(), period)?;

    let values = window_extremes(highs, lows, period)
        .zip(&closes[period - 1..])
        .map(|((highest_high, lowest_low), close)| {
            if highest_high == lowest_low {
                0.0
            } else {
                (highest_high - close) / (highest_high - lowest_low) * -100.0
            }
        })
        .collect();

    Ok(Series::new(period - 1, values))
}

// Calculate CCI (Commodity Channel Index)
pub fn calculate_cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<Series> {
    ensure_period("CCI", "period", period)?;
    ensure_same_len("CCI", highs.len(), &[lows.len(), closes.len()])?;
    ensure_len("CCI", highs.len(), period)?;

    let typical = typical_prices(highs, lows, closes);
    let sma = calculate_sma(&typical, period)?;

    let values = typical
        .windows(period)
        .zip(&sma.values)
        .map(|(window, &mean)| {
            let mean_deviation = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
            if mean_deviation == 0.0 {
                0.0
            } else {
                (window[period - 1] - mean) / (CCI_CONSTANT * mean_deviation)
            }
        })
        .collect();

    Ok(Series::new(sma.offset, values))
}

/// Money flow index over the `period` typical-price changes ending at each bar.
///
/// The money ratio falls back to 100 when there is no negative flow in the
/// window. Needs `period + 1` bars.
pub fn calculate_mfi(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
    period: usize,
) -> Result<Series> {
    ensure_period("MFI", "period", period)?;
    ensure_same_len("MFI", highs.len(), &[lows.len(), closes.len(), volumes.len()])?;
    let required = lookback("MFI", period.checked_add(1))?;
    ensure_len("MFI", highs.len(), required)?;

    let typical = typical_prices(highs, lows, closes);
    let raw_money_flow: Vec<f64> = typical.iter().zip(volumes).map(|(tp, v)| tp * v).collect();

    let mut results = Vec::with_capacity(typical.len() - period);

    for i in period..typical.len() {
        let mut positive_flow = 0.0;
        let mut negative_flow = 0.0;

        for j in (i + 1 - period)..=i {
            if typical[j] > typical[j - 1] {
                positive_flow += raw_money_flow[j];
            } else if typical[j] < typical[j - 1] {
                negative_flow += raw_money_flow[j];
            }
        }

        let money_ratio = if negative_flow != 0.0 {
            positive_flow / negative_flow
        } else {
            100.0
        };
        results.push(100.0 - (100.0 / (1.0 + money_ratio)));
    }

    Ok(Series::new(period, results))
}
