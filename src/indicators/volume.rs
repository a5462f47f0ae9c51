use crate::error::{ensure_len, ensure_same_len, Result};
use crate::indicators::output::Series;
use std::cmp::Ordering;

// Calculate OBV (On Balance Volume)
//
// Starts from the first bar's volume, then adds or subtracts each bar's
// volume depending on the close direction. Equal closes leave it unchanged.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Result<Series> {
    ensure_same_len("OBV", closes.len(), &[volumes.len()])?;
    ensure_len("OBV", closes.len(), 2)?;

    let mut results = Vec::with_capacity(closes.len());
    let mut obv = volumes[0];
    results.push(obv);

    for i in 1..closes.len() {
        match closes[i].partial_cmp(&closes[i - 1]) {
            Some(Ordering::Greater) => obv += volumes[i],
            Some(Ordering::Less) => obv -= volumes[i],
            _ => {}
        }
        results.push(obv);
    }

    Ok(Series::full(results))
}
