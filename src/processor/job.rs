use crate::indicators::IndicatorKind;
use crate::models::Candle;
use serde::{Deserialize, Serialize};

/// One unit of batch work: a candle history for a (symbol, interval) pair
/// and the indicators to compute over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationJob {
    pub symbol: String,
    pub interval: String,
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub indicators: Vec<IndicatorKind>,
}

impl CalculationJob {
    pub fn new(
        symbol: String,
        interval: String,
        candles: Vec<Candle>,
        indicators: Vec<IndicatorKind>,
    ) -> Self {
        Self {
            symbol,
            interval,
            candles,
            indicators,
        }
    }

    pub fn job_key(&self) -> String {
        let indicators: Vec<&str> = self.indicators.iter().map(|kind| kind.name()).collect();
        format!(
            "job:{}:{}:{}",
            self.symbol,
            self.interval,
            indicators.join(","),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_key_lists_indicators() {
        let job = CalculationJob::new(
            "INFY".to_string(),
            "1d".to_string(),
            vec![],
            vec![IndicatorKind::Rsi, IndicatorKind::ParabolicSar],
        );
        assert_eq!(job.job_key(), "job:INFY:1d:RSI,PARABOLIC_SAR");
    }

    #[test]
    fn deserializes_without_indicator_list() {
        let job: CalculationJob = serde_json::from_str(
            r#"{"symbol":"TCS","interval":"15m","candles":[{"o":1,"h":2,"l":0.5,"c":1.5,"v":10}]}"#,
        )
        .unwrap();
        assert_eq!(job.candles.len(), 1);
        assert!(job.indicators.is_empty());
    }
}
