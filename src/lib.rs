// Export all necessary modules
pub mod cli;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod processor;
pub mod utils;

pub use crate::error::{IndicatorError, Result};
pub use crate::indicators::{IndicatorCalculator, IndicatorKind, IndicatorParams, IndicatorReport, IndicatorValue};
pub use crate::models::{Candle, CandleData};
