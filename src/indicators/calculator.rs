use crate::error::{IndicatorError, Result};
use crate::indicators::momentum::{
    calculate_cci, calculate_macd_seeded, calculate_mfi, calculate_rsi, calculate_stochastic,
    calculate_williams_r,
};
use crate::indicators::output::{
    AdxOutput, BollingerOutput, FibonacciLevels, MacdOutput, Series, StochasticOutput,
    SupportResistanceLevels,
};
use crate::indicators::support_resistance::{calculate_fibonacci, calculate_support_resistance};
use crate::indicators::trend::{
    calculate_adx_seeded, calculate_ema_seeded, calculate_parabolic_sar, calculate_sma,
    calculate_vwap, EmaSeed,
};
use crate::indicators::volatility::{calculate_atr, calculate_bollinger_bands};
use crate::indicators::volume::calculate_obv;
use crate::models::{Candle, CandleData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Every indicator the calculator can dispatch to.
///
/// Serializes as the result key used in reports (`rsi`, `bollingerBands`,
/// ...); parses from request names in any case, aliases and result keys included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum IndicatorKind {
    #[serde(rename = "rsi")]
    Rsi,
    #[serde(rename = "macd")]
    Macd,
    #[serde(rename = "bollingerBands")]
    BollingerBands,
    #[serde(rename = "sma")]
    Sma,
    #[serde(rename = "ema")]
    Ema,
    #[serde(rename = "stochastic")]
    Stochastic,
    #[serde(rename = "williamsR")]
    WilliamsR,
    #[serde(rename = "vwap")]
    Vwap,
    #[serde(rename = "atr")]
    Atr,
    #[serde(rename = "adx")]
    Adx,
    #[serde(rename = "parabolicSAR")]
    ParabolicSar,
    #[serde(rename = "cci")]
    Cci,
    #[serde(rename = "obv")]
    Obv,
    #[serde(rename = "mfi")]
    Mfi,
    #[serde(rename = "supportResistance")]
    SupportResistance,
    #[serde(rename = "fibonacci")]
    Fibonacci,
}

/// Computed when a request names no indicators.
pub const DEFAULT_INDICATORS: [IndicatorKind; 3] = [
    IndicatorKind::Rsi,
    IndicatorKind::Macd,
    IndicatorKind::BollingerBands,
];

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 16] = [
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::BollingerBands,
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Stochastic,
        IndicatorKind::WilliamsR,
        IndicatorKind::Vwap,
        IndicatorKind::Atr,
        IndicatorKind::Adx,
        IndicatorKind::ParabolicSar,
        IndicatorKind::Cci,
        IndicatorKind::Obv,
        IndicatorKind::Mfi,
        IndicatorKind::SupportResistance,
        IndicatorKind::Fibonacci,
    ];

    /// Canonical request name.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::BollingerBands => "BOLLINGER",
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Stochastic => "STOCHASTIC",
            IndicatorKind::WilliamsR => "WILLIAMS_R",
            IndicatorKind::Vwap => "VWAP",
            IndicatorKind::Atr => "ATR",
            IndicatorKind::Adx => "ADX",
            IndicatorKind::ParabolicSar => "PARABOLIC_SAR",
            IndicatorKind::Cci => "CCI",
            IndicatorKind::Obv => "OBV",
            IndicatorKind::Mfi => "MFI",
            IndicatorKind::SupportResistance => "SUPPORT_RESISTANCE",
            IndicatorKind::Fibonacci => "FIBONACCI",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_uppercase().as_str() {
            "RSI" => IndicatorKind::Rsi,
            "MACD" => IndicatorKind::Macd,
            "BOLLINGER" | "BOLLINGER_BANDS" | "BOLLINGERBANDS" => IndicatorKind::BollingerBands,
            "SMA" => IndicatorKind::Sma,
            "EMA" => IndicatorKind::Ema,
            "STOCHASTIC" => IndicatorKind::Stochastic,
            "WILLIAMS_R" | "WILLIAMSR" => IndicatorKind::WilliamsR,
            "VWAP" => IndicatorKind::Vwap,
            "ATR" => IndicatorKind::Atr,
            "ADX" => IndicatorKind::Adx,
            "PARABOLIC_SAR" | "PARABOLICSAR" | "SAR" => IndicatorKind::ParabolicSar,
            "CCI" => IndicatorKind::Cci,
            "OBV" => IndicatorKind::Obv,
            "MFI" => IndicatorKind::Mfi,
            "SUPPORT_RESISTANCE" | "SUPPORTRESISTANCE" => IndicatorKind::SupportResistance,
            "FIBONACCI" => IndicatorKind::Fibonacci,
            _ => return Err(IndicatorError::UnknownIndicator(s.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for IndicatorKind {
    type Error = IndicatorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Parameters used when the calculator dispatches an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub sma_period: usize,
    pub ema_period: usize,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub williams_r_period: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub sar_acceleration: f64,
    pub sar_maximum: f64,
    pub cci_period: usize,
    pub mfi_period: usize,
    pub support_resistance_period: usize,
    /// Seeding of every EMA-based indicator (EMA, MACD, ADX).
    pub ema_seed: EmaSeed,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            sma_period: 20,
            ema_period: 20,
            stochastic_k: 14,
            stochastic_d: 3,
            williams_r_period: 14,
            atr_period: 14,
            adx_period: 14,
            sar_acceleration: 0.02,
            sar_maximum: 0.2,
            cci_period: 20,
            mfi_period: 14,
            support_resistance_period: 20,
            ema_seed: EmaSeed::FirstValue,
        }
    }
}

impl IndicatorParams {
    /// Human readable parameter summary for one indicator.
    pub fn describe(&self, kind: IndicatorKind) -> String {
        match kind {
            IndicatorKind::Rsi => format!("period={}", self.rsi_period),
            IndicatorKind::Macd => format!(
                "fast={} slow={} signal={} seed={:?}",
                self.macd_fast, self.macd_slow, self.macd_signal, self.ema_seed
            ),
            IndicatorKind::BollingerBands => {
                format!("period={} k={}", self.bollinger_period, self.bollinger_std_dev)
            }
            IndicatorKind::Sma => format!("period={}", self.sma_period),
            IndicatorKind::Ema => format!("period={} seed={:?}", self.ema_period, self.ema_seed),
            IndicatorKind::Stochastic => format!("k={} d={}", self.stochastic_k, self.stochastic_d),
            IndicatorKind::WilliamsR => format!("period={}", self.williams_r_period),
            IndicatorKind::Vwap | IndicatorKind::Obv => "-".to_string(),
            IndicatorKind::Atr => format!("period={}", self.atr_period),
            IndicatorKind::Adx => format!("period={} seed={:?}", self.adx_period, self.ema_seed),
            IndicatorKind::ParabolicSar => format!(
                "acceleration={} maximum={}",
                self.sar_acceleration, self.sar_maximum
            ),
            IndicatorKind::Cci => format!("period={}", self.cci_period),
            IndicatorKind::Mfi => format!("period={}", self.mfi_period),
            IndicatorKind::SupportResistance => format!("period={}", self.support_resistance_period),
            IndicatorKind::Fibonacci => "range=highest high..lowest low".to_string(),
        }
    }
}

/// Result of one dispatched indicator.
///
/// Serializes as the bare group (`{"offset":..,"values":[..]}`,
/// `{"upperBand":..}`, ...); insufficient history serializes as
/// `{"required":..,"available":..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Series(Series),
    Macd(MacdOutput),
    Bollinger(BollingerOutput),
    Stochastic(StochasticOutput),
    Adx(AdxOutput),
    Fibonacci(FibonacciLevels),
    SupportResistance(SupportResistanceLevels),
    /// Not enough candles for this indicator's lookback.
    InsufficientData { required: usize, available: usize },
}

impl IndicatorValue {
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            IndicatorValue::Series(series) => Some(series),
            _ => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, IndicatorValue::InsufficientData { .. })
    }
}

pub type IndicatorReport = BTreeMap<IndicatorKind, IndicatorValue>;

/// Dispatches requested indicators over one candle sequence.
#[derive(Debug, Clone, Default)]
pub struct IndicatorCalculator {
    params: IndicatorParams,
}

impl IndicatorCalculator {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Computes every requested indicator.
    ///
    /// Fails on an empty candle slice. An indicator without enough history
    /// is reported as [`IndicatorValue::InsufficientData`] instead of
    /// failing the whole request; any other error is returned. An empty
    /// `kinds` slice selects [`DEFAULT_INDICATORS`].
    #[instrument(skip_all, fields(candles = candles.len(), requested = kinds.len()))]
    pub fn process(&self, candles: &[Candle], kinds: &[IndicatorKind]) -> Result<IndicatorReport> {
        if candles.is_empty() {
            return Err(IndicatorError::EmptyInput);
        }

        let kinds = if kinds.is_empty() { &DEFAULT_INDICATORS[..] } else { kinds };
        let data = CandleData::from_candles(candles);
        let mut report = IndicatorReport::new();

        for &kind in kinds {
            if report.contains_key(&kind) {
                continue;
            }

            let value = match self.dispatch(kind, candles, &data) {
                Ok(value) => value,
                Err(IndicatorError::InsufficientData { required, available, .. }) => {
                    debug!(indicator = %kind, required, available, "Not enough candles for indicator");
                    IndicatorValue::InsufficientData { required, available }
                }
                Err(e) => return Err(e),
            };
            report.insert(kind, value);
        }

        debug!("Calculated {} indicators", report.len());
        Ok(report)
    }

    /// Parses indicator names, failing on the first unknown one, then
    /// runs [`process`](Self::process).
    pub fn process_named<S: AsRef<str>>(&self, candles: &[Candle], names: &[S]) -> Result<IndicatorReport> {
        let kinds = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<IndicatorKind>>>()?;
        self.process(candles, &kinds)
    }

    /// Computes a single indicator, propagating every error.
    pub fn calculate(&self, candles: &[Candle], kind: IndicatorKind) -> Result<IndicatorValue> {
        if candles.is_empty() {
            return Err(IndicatorError::EmptyInput);
        }
        self.dispatch(kind, candles, &CandleData::from_candles(candles))
    }

    fn dispatch(&self, kind: IndicatorKind, candles: &[Candle], data: &CandleData) -> Result<IndicatorValue> {
        let p = &self.params;
        let value = match kind {
            IndicatorKind::Rsi => IndicatorValue::Series(calculate_rsi(&data.close, p.rsi_period)?),
            IndicatorKind::Macd => IndicatorValue::Macd(calculate_macd_seeded(
                &data.close,
                p.macd_fast,
                p.macd_slow,
                p.macd_signal,
                p.ema_seed,
            )?),
            IndicatorKind::BollingerBands => IndicatorValue::Bollinger(calculate_bollinger_bands(
                &data.close,
                p.bollinger_period,
                p.bollinger_std_dev,
            )?),
            IndicatorKind::Sma => IndicatorValue::Series(calculate_sma(&data.close, p.sma_period)?),
            IndicatorKind::Ema => {
                IndicatorValue::Series(calculate_ema_seeded(&data.close, p.ema_period, p.ema_seed)?)
            }
            IndicatorKind::Stochastic => IndicatorValue::Stochastic(calculate_stochastic(
                &data.high,
                &data.low,
                &data.close,
                p.stochastic_k,
                p.stochastic_d,
            )?),
            IndicatorKind::WilliamsR => IndicatorValue::Series(calculate_williams_r(
                &data.high,
                &data.low,
                &data.close,
                p.williams_r_period,
            )?),
            IndicatorKind::Vwap => IndicatorValue::Series(calculate_vwap(candles)?),
            IndicatorKind::Atr => {
                IndicatorValue::Series(calculate_atr(&data.high, &data.low, &data.close, p.atr_period)?)
            }
            IndicatorKind::Adx => IndicatorValue::Adx(calculate_adx_seeded(
                &data.high,
                &data.low,
                &data.close,
                p.adx_period,
                p.ema_seed,
            )?),
            IndicatorKind::ParabolicSar => IndicatorValue::Series(calculate_parabolic_sar(
                &data.high,
                &data.low,
                p.sar_acceleration,
                p.sar_maximum,
            )?),
            IndicatorKind::Cci => {
                IndicatorValue::Series(calculate_cci(&data.high, &data.low, &data.close, p.cci_period)?)
            }
            IndicatorKind::Obv => IndicatorValue::Series(calculate_obv(&data.close, &data.volume)?),
            IndicatorKind::Mfi => IndicatorValue::Series(calculate_mfi(
                &data.high,
                &data.low,
                &data.close,
                &data.volume,
                p.mfi_period,
            )?),
            IndicatorKind::SupportResistance => IndicatorValue::SupportResistance(
                calculate_support_resistance(&data.high, &data.low, p.support_resistance_period)?,
            ),
            IndicatorKind::Fibonacci => {
                let (high, low) = match (data.highest_high(), data.lowest_low()) {
                    (Some(high), Some(low)) => (high, low),
                    _ => return Err(IndicatorError::EmptyInput),
                };
                IndicatorValue::Fibonacci(calculate_fibonacci(high, low))
            }
        };
        Ok(value)
    }
}
