#![allow(dead_code)]

use indicator_engine::Candle;

/// Twenty closes with a rising zig-zag.
pub fn sample_prices() -> Vec<f64> {
    vec![
        100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0, 108.0, 107.0, 109.0, 111.0, 110.0, 112.0,
        114.0, 113.0, 115.0, 117.0, 116.0, 118.0, 120.0,
    ]
}

/// Fifteen steadily rising bars: every bar opens at the previous close,
/// trades 2 above and 1 below its open and closes 1 higher.
pub fn sample_candles() -> Vec<Candle> {
    let volumes = [
        1000.0, 1200.0, 1100.0, 1300.0, 1400.0, 1250.0, 1350.0, 1450.0, 1550.0, 1650.0, 1750.0,
        1850.0, 1950.0, 2050.0, 2150.0,
    ];

    volumes
        .iter()
        .enumerate()
        .map(|(i, &volume)| {
            let open = 100.0 + i as f64;
            Candle::new(open, open + 2.0, open - 1.0, open + 1.0, volume)
        })
        .collect()
}

/// A drifting sine wave, long enough for every default lookback.
pub fn wave_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + (t * 0.25).sin() * 8.0 + t * 0.05;
            let open = close - (t * 0.7).cos();
            let high = open.max(close) + 1.0 + (t * 0.3).sin().abs();
            let low = open.min(close) - 1.0 - (t * 0.45).cos().abs();
            Candle::new(open, high, low, close, 1_000.0 + (t * 0.2).cos() * 300.0)
        })
        .collect()
}

pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub fn assert_within(values: &[f64], low: f64, high: f64, context: &str) {
    for (i, value) in values.iter().enumerate() {
        assert!(
            value.is_finite() && *value >= low && *value <= high,
            "{context}: value {value} at {i} outside [{low}, {high}]"
        );
    }
}
