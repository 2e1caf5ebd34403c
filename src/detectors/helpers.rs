//! Column extraction and smoothing shared across detector modules.

use crate::OHLCV;

// ============================================================
// COLUMNS
// ============================================================

/// Open/close/high/low columns of a candle series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    pub open: Vec<f64>,
    pub close: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
}

impl Columns {
    pub fn from_candles<T: OHLCV>(candles: &[T]) -> Self {
        let mut cols = Columns {
            open: Vec::with_capacity(candles.len()),
            close: Vec::with_capacity(candles.len()),
            high: Vec::with_capacity(candles.len()),
            low: Vec::with_capacity(candles.len()),
        };
        for c in candles {
            cols.open.push(c.open());
            cols.close.push(c.close());
            cols.high.push(c.high());
            cols.low.push(c.low());
        }
        cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

// ============================================================
// SMOOTHING
// ============================================================

/// Exponential moving average, TA-Lib style.
///
/// `alpha = 2 / (period + 1)`. Leading NaN values are skipped; the first
/// output is the simple average of the next `period` values and everything
/// before it is NaN. A NaN after the seed propagates to every later value.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 {
        return out;
    }

    let start = values.iter().position(|v| !v.is_nan()).unwrap_or(n);
    let seed_end = start + period;
    if seed_end > n {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = values[start..seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end - 1] = prev;

    for i in seed_end..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }

    out
}
