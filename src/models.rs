use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One interval of OHLCV market data.
///
/// Both the long (`open`, `high`, ...) and the short (`o`, `h`, ...) field
/// names are accepted when deserializing, since broker feeds use either.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(alias = "o")]
    pub open: f64,
    #[serde(alias = "h")]
    pub high: f64,
    #[serde(alias = "l")]
    pub low: f64,
    #[serde(alias = "c")]
    pub close: f64,
    #[serde(alias = "v", default)]
    pub volume: f64,
    #[serde(alias = "t", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// `(high + low + close) / 3`
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Column-oriented view of a candle sequence, extracted once per request.
#[derive(Debug, Clone, Default)]
pub struct CandleData {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub timestamp: Vec<Option<DateTime<Utc>>>,
}

impl CandleData {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut data = Self {
            open: Vec::with_capacity(candles.len()),
            high: Vec::with_capacity(candles.len()),
            low: Vec::with_capacity(candles.len()),
            close: Vec::with_capacity(candles.len()),
            volume: Vec::with_capacity(candles.len()),
            timestamp: Vec::with_capacity(candles.len()),
        };

        for candle in candles {
            data.open.push(candle.open);
            data.high.push(candle.high);
            data.low.push(candle.low);
            data.close.push(candle.close);
            data.volume.push(candle.volume);
            data.timestamp.push(candle.timestamp);
        }

        data
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn typical_prices(&self) -> Vec<f64> {
        typical_prices(&self.high, &self.low, &self.close)
    }

    /// Raw money flow: typical price times volume.
    pub fn money_flow(&self) -> Vec<f64> {
        self.typical_prices()
            .iter()
            .zip(&self.volume)
            .map(|(tp, volume)| tp * volume)
            .collect()
    }

    pub fn highest_high(&self) -> Option<f64> {
        self.high.iter().copied().reduce(f64::max)
    }

    pub fn lowest_low(&self) -> Option<f64> {
        self.low.iter().copied().reduce(f64::min)
    }
}

/// Typical price per bar. Callers must pass equal-length slices.
pub(crate) fn typical_prices(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    highs
        .iter()
        .zip(lows)
        .zip(closes)
        .map(|((high, low), close)| (high + low + close) / 3.0)
        .collect()
}
