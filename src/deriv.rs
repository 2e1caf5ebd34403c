//! Finite differences of an oscillator, normalized by its current value.
//!
//! With `s1`, `s2`, `s3` the oscillator delayed by one, two and three candles:
//!
//! | field    | formula                                |
//! |----------|----------------------------------------|
//! | `first`  | `(osc - s1) / osc`                     |
//! | `second` | `(osc - 2*s1 + s2) / osc`              |
//! | `third`  | `(osc - 3*s1 + 3*s2 - s3) / osc`       |
//! | `double` | `(osc - s2) / (2*osc)`                 |
//! | `triple` | `(osc - s3) / (3*osc)`                 |
//!
//! A zero oscillator value yields infinities or NaN; that is not an error.

use crate::{
    series::shift,
    source::{ensure_len, last_of},
    Result,
};

/// Values the newest derivative bundle depends on.
const LOOKBACK: usize = 4;

/// Derivative bundle at one candle.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Deriv {
    pub first: f64,
    pub second: f64,
    pub third: f64,
    /// Average slope over the last two candles.
    pub double: f64,
    /// Average slope over the last three candles.
    pub triple: f64,
}

/// Derivative bundle for every candle.
pub fn deriv(osc: &[f64]) -> Result<Vec<Deriv>> {
    ensure_len(osc.len(), 1)?;
    Ok(compute(osc))
}

/// Derivative bundle for the newest candle only.
pub fn deriv_last(osc: &[f64]) -> Result<Deriv> {
    ensure_len(osc.len(), 1)?;
    let tail = &osc[osc.len().saturating_sub(LOOKBACK)..];
    last_of(compute(tail))
}

fn compute(osc: &[f64]) -> Vec<Deriv> {
    let s1 = shift(osc, 1);
    let s2 = shift(osc, 2);
    let s3 = shift(osc, 3);

    osc.iter()
        .enumerate()
        .map(|(i, &x)| Deriv {
            first: (x - s1[i]) / x,
            second: (x - 2.0 * s1[i] + s2[i]) / x,
            third: (x - 3.0 * s1[i] + 3.0 * s2[i] - s3[i]) / x,
            double: (x - s2[i]) / (2.0 * x),
            triple: (x - s3[i]) / (3.0 * x),
        })
        .collect()
}
