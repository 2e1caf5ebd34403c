//! Heiken-Ashi candles, plain and EMA-smoothed.
//!
//! `ha_open` is the midpoint of the previous candle's body and `ha_close` the
//! candle's OHLC average. The first candle has no predecessor and uses its own
//! open and close instead.

use std::collections::HashMap;

use super::helpers::{ema, Columns};
use crate::{
    params::{get_percent, get_period, ParamMeta, ParameterizedIndicator},
    series::{nan_max, nan_min, shift_with},
    Indicator, Percent, Period, Result, OHLCV,
};

impl_with_defaults!(HeikenAshiDetector, SmoothedHeikenAshiDetector);

/// Midpoint of the previous body; index 0 falls back to its own body.
fn prev_body_mid(open: &[f64], close: &[f64]) -> Vec<f64> {
    let (Some(&o0), Some(&c0)) = (open.first(), close.first()) else {
        return Vec::new();
    };
    let prev_open = shift_with(open, 1, o0);
    let prev_close = shift_with(close, 1, c0);
    prev_open
        .iter()
        .zip(&prev_close)
        .map(|(o, c)| (o + c) / 2.0)
        .collect()
}

// ============================================================
// HEIKEN-ASHI
// ============================================================

/// One Heiken-Ashi candle with its trend flags.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HeikenAshiCandle {
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub bull: bool,
    pub bear: bool,
}

/// Heiken-Ashi transform with body and range filters.
///
/// `bull` needs the HA open at or below the candle low, `bear` the HA open at
/// or above the candle high; both also need a body of at least `body` percent
/// of the larger of HA open/close and a range of at least `size` percent of
/// the low.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeikenAshiDetector {
    pub body: Percent,
    pub size: Percent,
}

impl Default for HeikenAshiDetector {
    fn default() -> Self {
        Self {
            body: Percent::new_const(0.1),
            size: Percent::new_const(0.3),
        }
    }
}

impl Indicator for HeikenAshiDetector {
    type Value = HeikenAshiCandle;

    fn name(&self) -> &'static str {
        "HEIKEN_ASHI"
    }

    fn min_candles(&self) -> usize {
        1
    }

    fn live_window(&self) -> Option<usize> {
        Some(2)
    }

    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<HeikenAshiCandle> {
        let cols = Columns::from_candles(candles);
        let ha_open = prev_body_mid(&cols.open, &cols.close);
        let body = self.body.fraction();
        let size = self.size.fraction();

        (0..cols.len())
            .map(|i| {
                let open = ha_open[i];
                let close = (cols.open[i] + cols.high[i] + cols.low[i] + cols.close[i]) / 4.0;
                let (high, low) = (cols.high[i], cols.low[i]);

                let big = nan_max(open - close, close - open) / nan_max(open, close) >= body;
                let big_range = (high - low) / low >= size;

                HeikenAshiCandle {
                    open,
                    close,
                    high,
                    low,
                    bull: open <= low && big && big_range,
                    bear: open >= high && big && big_range,
                }
            })
            .collect()
    }
}

// ============================================================
// SMOOTHED HEIKEN-ASHI
// ============================================================

/// One smoothed Heiken-Ashi candle.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SmoothedHeikenAshiCandle {
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    /// Smoothed open below smoothed close
    pub green: bool,
}

/// Heiken-Ashi over EMA-smoothed prices, smoothed again.
///
/// Prices are smoothed with EMA(`len1`), turned into Heiken-Ashi candles, and
/// each HA column is smoothed with EMA(`len2`). The EMA seed makes every value
/// depend on the whole history, so live mode reads all candles.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SmoothedHeikenAshiDetector {
    pub len1: Period,
    pub len2: Period,
}

impl Default for SmoothedHeikenAshiDetector {
    fn default() -> Self {
        Self {
            len1: Period::new_const(12),
            len2: Period::new_const(3),
        }
    }
}

impl Indicator for SmoothedHeikenAshiDetector {
    type Value = SmoothedHeikenAshiCandle;

    fn name(&self) -> &'static str {
        "SMOOTHED_HEIKEN_ASHI"
    }

    fn min_candles(&self) -> usize {
        self.len1.get() + self.len2.get()
    }

    fn live_window(&self) -> Option<usize> {
        None
    }

    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<SmoothedHeikenAshiCandle> {
        let cols = Columns::from_candles(candles);
        let (len1, len2) = (self.len1.get(), self.len2.get());

        let o = ema(&cols.open, len1);
        let c = ema(&cols.close, len1);
        let h = ema(&cols.high, len1);
        let l = ema(&cols.low, len1);

        let ha_close: Vec<f64> = (0..cols.len())
            .map(|i| (o[i] + h[i] + l[i] + c[i]) / 4.0)
            .collect();
        let ha_open = prev_body_mid(&o, &c);
        let ha_high: Vec<f64> = (0..cols.len())
            .map(|i| nan_max(h[i], nan_max(ha_open[i], ha_close[i])))
            .collect();
        let ha_low: Vec<f64> = (0..cols.len())
            .map(|i| nan_min(l[i], nan_min(ha_open[i], ha_close[i])))
            .collect();

        let o2 = ema(&ha_open, len2);
        let c2 = ema(&ha_close, len2);
        let h2 = ema(&ha_high, len2);
        let l2 = ema(&ha_low, len2);

        (0..cols.len())
            .map(|i| SmoothedHeikenAshiCandle {
                open: o2[i],
                close: c2[i],
                high: h2[i],
                low: l2[i],
                green: o2[i] < c2[i],
            })
            .collect()
    }
}

// ============================================================
// PARAMETERS
// ============================================================

static HEIKENASHI_PARAMS: &[ParamMeta] = &[
    ParamMeta::percent(
        "body",
        0.1,
        (0.05, 0.5, 0.05),
        "Minimum HA body in percent of the larger of open/close",
    ),
    ParamMeta::percent(
        "size",
        0.3,
        (0.1, 1.0, 0.1),
        "Minimum candle range in percent of the low",
    ),
];

static SMOOTHEDHEIKENASHI_PARAMS: &[ParamMeta] = &[
    ParamMeta::period(
        "len1",
        12.0,
        (6.0, 24.0, 2.0),
        "EMA period applied to raw prices",
    ),
    ParamMeta::period(
        "len2",
        3.0,
        (2.0, 6.0, 1.0),
        "EMA period applied to Heiken-Ashi columns",
    ),
];

impl ParameterizedIndicator for HeikenAshiDetector {
    fn param_meta() -> &'static [ParamMeta] {
        HEIKENASHI_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            body: get_percent(params, "body", 0.1)?,
            size: get_percent(params, "size", 0.3)?,
        })
    }

    fn indicator_name() -> &'static str {
        "HEIKEN_ASHI"
    }
}

impl ParameterizedIndicator for SmoothedHeikenAshiDetector {
    fn param_meta() -> &'static [ParamMeta] {
        SMOOTHEDHEIKENASHI_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            len1: get_period(params, "len1", 12)?,
            len2: get_period(params, "len2", 3)?,
        })
    }

    fn indicator_name() -> &'static str {
        "SMOOTHED_HEIKEN_ASHI"
    }
}
