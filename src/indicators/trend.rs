use crate::error::{ensure_len, ensure_period, ensure_same_len, lookback, IndicatorError, Result};
use crate::indicators::output::{AdxOutput, Series};
use crate::indicators::volatility::calculate_true_range;
use crate::models::Candle;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How the EMA recursion is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSeed {
    /// Seed with the first input value and run the recursion over the whole
    /// input, publishing only from index `period - 1` on.
    #[default]
    FirstValue,
    /// Seed with the SMA of the first `period` values.
    Sma,
}

// Calculate SMA (Simple Moving Average)
pub fn calculate_sma(prices: &[f64], period: usize) -> Result<Series> {
    ensure_period("SMA", "period", period)?;
    ensure_len("SMA", prices.len(), period)?;

    let divisor = period as f64;
    let values = prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / divisor)
        .collect();

    Ok(Series::new(period - 1, values))
}

// Calculate EMA (Exponential Moving Average), seeded with the first price
pub fn calculate_ema(prices: &[f64], period: usize) -> Result<Series> {
    calculate_ema_seeded(prices, period, EmaSeed::FirstValue)
}

/// EMA with multiplier `2 / (period + 1)`.
///
/// Both seeding modes publish `len - period + 1` values starting at input
/// index `period - 1`; they differ only in the value the recursion starts from.
pub fn calculate_ema_seeded(prices: &[f64], period: usize, seed: EmaSeed) -> Result<Series> {
    ensure_period("EMA", "period", period)?;
    ensure_len("EMA", prices.len(), period)?;

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len() - period + 1);

    match seed {
        EmaSeed::FirstValue => {
            let mut ema = prices[0];
            for (i, &price) in prices.iter().enumerate() {
                if i > 0 {
                    ema = (price * multiplier) + (ema * (1.0 - multiplier));
                }
                if i + 1 >= period {
                    values.push(ema);
                }
            }
        }
        EmaSeed::Sma => {
            let mut ema = prices[..period].iter().sum::<f64>() / period as f64;
            values.push(ema);
            for &price in &prices[period..] {
                ema = (price * multiplier) + (ema * (1.0 - multiplier));
                values.push(ema);
            }
        }
    }

    Ok(Series::new(period - 1, values))
}

/// Running volume-weighted average of the typical price, one value per candle.
///
/// While cumulative volume is still zero the candle's typical price is used.
pub fn calculate_vwap(candles: &[Candle]) -> Result<Series> {
    ensure_len("VWAP", candles.len(), 1)?;

    let mut cumulative_volume = 0.0;
    let mut cumulative_price_volume = 0.0;

    let values = candles
        .iter()
        .map(|candle| {
            let typical_price = candle.typical_price();
            cumulative_volume += candle.volume;
            cumulative_price_volume += typical_price * candle.volume;

            if cumulative_volume > 0.0 {
                cumulative_price_volume / cumulative_volume
            } else {
                typical_price
            }
        })
        .collect();

    Ok(Series::full(values))
}

// Calculate ADX (Average Directional Index) with first-value seeded smoothing
pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Result<AdxOutput> {
    calculate_adx_seeded(highs, lows, closes, period, EmaSeed::FirstValue)
}

/// ADX, +DI and -DI.
///
/// True range and directional movement are smoothed with the EMA primitive.
/// The DI series start at input index `period`, the ADX line at
/// `2 * period - 1`.
pub fn calculate_adx_seeded(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    seed: EmaSeed,
) -> Result<AdxOutput> {
    ensure_period("ADX", "period", period)?;
    ensure_same_len("ADX", highs.len(), &[lows.len(), closes.len()])?;
    let required = lookback("ADX", period.checked_mul(2))?;
    ensure_len("ADX", highs.len(), required)?;

    let true_ranges = calculate_true_range(highs, lows, closes)?;
    let (plus_dm, minus_dm) = directional_movement(highs, lows);

    let smoothed_tr = calculate_ema_seeded(&true_ranges, period, seed)?.values;
    let smoothed_plus_dm = calculate_ema_seeded(&plus_dm, period, seed)?.values;
    let smoothed_minus_dm = calculate_ema_seeded(&minus_dm, period, seed)?.values;

    let plus_di = directional_index(&smoothed_plus_dm, &smoothed_tr);
    let minus_di = directional_index(&smoothed_minus_dm, &smoothed_tr);

    let dx: Vec<f64> = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(plus, minus)| {
            let sum = plus + minus;
            if sum > 0.0 {
                (plus - minus).abs() / sum * 100.0
            } else {
                0.0
            }
        })
        .collect();

    let adx = calculate_ema_seeded(&dx, period, seed)?.values;

    Ok(AdxOutput {
        adx_offset: 2 * period - 1,
        di_offset: period,
        adx,
        plus_di,
        minus_di,
    })
}

/// 100 * smoothed DM / smoothed TR, or 0 where the true range vanished.
fn directional_index(smoothed_dm: &[f64], smoothed_tr: &[f64]) -> Vec<f64> {
    smoothed_dm
        .iter()
        .zip(smoothed_tr)
        .map(|(dm, tr)| if *tr > 0.0 { dm / tr * 100.0 } else { 0.0 })
        .collect()
}

/// +DM and -DM for each consecutive pair of bars (`len - 1` values each).
fn directional_movement(highs: &[f64], lows: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let steps = highs.len().saturating_sub(1);
    let mut plus_dm = Vec::with_capacity(steps);
    let mut minus_dm = Vec::with_capacity(steps);

    for i in 1..highs.len() {
        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
    }

    (plus_dm, minus_dm)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Up,
    Down,
}

/// Parabolic stop-and-reverse, one value per bar.
///
/// Starts in an uptrend with `sar = lows[0]` and `ep = highs[0]`.
pub fn calculate_parabolic_sar(
    highs: &[f64],
    lows: &[f64],
    acceleration: f64,
    maximum: f64,
) -> Result<Series> {
    if !(acceleration > 0.0 && acceleration.is_finite()) {
        return Err(IndicatorError::InvalidParameter {
            indicator: "PARABOLIC_SAR",
            reason: format!("acceleration must be positive, got {}", acceleration),
        });
    }
    if !(maximum >= acceleration && maximum.is_finite()) {
        return Err(IndicatorError::InvalidParameter {
            indicator: "PARABOLIC_SAR",
            reason: format!(
                "maximum ({}) must not be lower than acceleration ({})",
                maximum, acceleration
            ),
        });
    }
    ensure_same_len("PARABOLIC_SAR", highs.len(), &[lows.len()])?;
    ensure_len("PARABOLIC_SAR", highs.len(), 2)?;

    let mut sar = Vec::with_capacity(highs.len());
    let mut trend = Trend::Up;
    let mut af = acceleration;
    let mut ep = highs[0];
    sar.push(lows[0]);

    for i in 1..highs.len() {
        let prev_sar = sar[i - 1];
        let mut current = prev_sar + af * (ep - prev_sar);
        // The bar two back only exists from the third bar on.
        let back = if i > 1 { i - 2 } else { i - 1 };

        match trend {
            Trend::Up => {
                current = current.min(lows[i - 1]).min(lows[back]);

                if lows[i] <= current {
                    trace!(index = i, "parabolic SAR reversed to downtrend");
                    trend = Trend::Down;
                    current = ep;
                    ep = lows[i];
                    af = acceleration;
                } else if highs[i] > ep {
                    ep = highs[i];
                    af = (af + acceleration).min(maximum);
                }
            }
            Trend::Down => {
                current = current.max(highs[i - 1]).max(highs[back]);

                if highs[i] >= current {
                    trace!(index = i, "parabolic SAR reversed to uptrend");
                    trend = Trend::Up;
                    current = ep;
                    ep = highs[i];
                    af = acceleration;
                } else if lows[i] < ep {
                    ep = lows[i];
                    af = (af + acceleration).min(maximum);
                }
            }
        }

        sar.push(current);
    }

    Ok(Series::full(sar))
}
