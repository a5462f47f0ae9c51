use thiserror::Error;

/// Errors produced by indicator calculations.
///
/// `InsufficientData` is the single marker for "not enough history": no
/// calculation ever returns an empty vector in its place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{indicator}: insufficient data, need {required} values but got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator}: invalid parameter: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },

    #[error("{indicator}: input length mismatch, expected {expected} values but got {actual}")]
    LengthMismatch {
        indicator: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("no candle data provided")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Fails with `InsufficientData` when fewer than `required` values are available.
pub(crate) fn ensure_len(indicator: &'static str, available: usize, required: usize) -> Result<()> {
    if available < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            available,
        });
    }
    Ok(())
}

pub(crate) fn ensure_period(indicator: &'static str, name: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter {
            indicator,
            reason: format!("{} must be greater than 0", name),
        });
    }
    Ok(())
}

/// Every parallel input array must have the same length as the first one.
pub(crate) fn ensure_same_len(indicator: &'static str, expected: usize, others: &[usize]) -> Result<()> {
    if let Some(&actual) = others.iter().find(|&&len| len != expected) {
        return Err(IndicatorError::LengthMismatch {
            indicator,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Minimum input length derived from caller periods; `None` means the
/// arithmetic overflowed.
pub(crate) fn lookback(indicator: &'static str, required: Option<usize>) -> Result<usize> {
    required.ok_or_else(|| IndicatorError::InvalidParameter {
        indicator,
        reason: "period is too large".to_string(),
    })
}
