pub mod calculator;
pub mod momentum;
pub mod output;
pub mod support_resistance;
pub mod trend;
pub mod volatility;
pub mod volume;

// Re-export the orchestrator and result types
pub use self::calculator::{
    IndicatorCalculator, IndicatorKind, IndicatorParams, IndicatorReport, IndicatorValue,
    DEFAULT_INDICATORS,
};
pub use self::output::{
    AdxOutput, BollingerOutput, FibonacciLevels, MacdOutput, PriceLevel, Series,
    StochasticOutput, SupportResistanceLevels,
};
pub use self::trend::EmaSeed;
