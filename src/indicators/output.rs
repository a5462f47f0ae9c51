use serde::Serialize;

/// A derived series aligned to its input.
///
/// `values[i]` belongs to input index `i + offset`. For a windowed
/// indicator with lookback `p` the offset is `p - 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub offset: usize,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(offset: usize, values: Vec<f64>) -> Self {
        Self { offset, values }
    }

    /// A series that starts at the first input value.
    pub fn full(values: Vec<f64>) -> Self {
        Self { offset: 0, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Input index that output index `i` corresponds to.
    #[inline]
    pub fn input_index(&self, i: usize) -> usize {
        i + self.offset
    }

    /// Pairs every value with the input item it was computed for.
    ///
    /// `inputs` is the slice the series was derived from (candles,
    /// timestamps, closes...).
    pub fn zip_inputs<'a, T>(&'a self, inputs: &'a [T]) -> impl Iterator<Item = (&'a T, f64)> + 'a {
        inputs
            .iter()
            .skip(self.offset)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdOutput {
    pub offset: usize,
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerOutput {
    pub offset: usize,
    pub upper_band: Vec<f64>,
    pub middle_band: Vec<f64>,
    pub lower_band: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StochasticOutput {
    pub offset: usize,
    pub k_percent: Vec<f64>,
    pub d_percent: Vec<f64>,
}

/// ADX family. The directional indicators and the ADX line start at
/// different input indices and have different lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdxOutput {
    pub adx_offset: usize,
    pub di_offset: usize,
    pub adx: Vec<f64>,
    #[serde(rename = "plusDI")]
    pub plus_di: Vec<f64>,
    #[serde(rename = "minusDI")]
    pub minus_di: Vec<f64>,
}

impl AdxOutput {
    /// Index into `plus_di`/`minus_di` matching `adx[i]`.
    #[inline]
    pub fn di_index_for_adx(&self, i: usize) -> usize {
        i + self.adx_offset - self.di_offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibonacciLevels {
    pub level_0: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_500: f64,
    pub level_618: f64,
    pub level_786: f64,
    pub level_100: f64,
}

impl FibonacciLevels {
    pub const RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

    /// `(ratio, price)` pairs from the high down to the low.
    pub fn levels(&self) -> [(f64, f64); 7] {
        [
            (Self::RATIOS[0], self.level_0),
            (Self::RATIOS[1], self.level_236),
            (Self::RATIOS[2], self.level_382),
            (Self::RATIOS[3], self.level_500),
            (Self::RATIOS[4], self.level_618),
            (Self::RATIOS[5], self.level_786),
            (Self::RATIOS[6], self.level_100),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceLevel {
    pub index: usize,
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SupportResistanceLevels {
    pub support: Vec<PriceLevel>,
    pub resistance: Vec<PriceLevel>,
}
