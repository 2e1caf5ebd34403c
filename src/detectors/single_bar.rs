//! Single-bar candlestick patterns

use std::collections::HashMap;

use crate::{
    params::{get_percent, ParamMeta, ParameterizedIndicator},
    Indicator, IndicatorError, OHLCVExt, Percent, Result, OHLCV,
};

impl_with_defaults!(MarubozuDetector, PinbarDetector);

// ============================================================
// MARUBOZU
// ============================================================

/// Marubozu: long body closing at (or near) the extreme of the candle.
///
/// `+1` for a green candle whose body is at least `body` percent of the open
/// and whose upper wick is at most `sensitivity` percent of the close; `-1` for
/// the mirrored red candle (lower wick measured from the close); `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarubozuDetector {
    pub body: Percent,
    pub sensitivity: Percent,
}

impl Default for MarubozuDetector {
    fn default() -> Self {
        Self {
            body: Percent::new_const(0.1),
            sensitivity: Percent::new_const(0.0),
        }
    }
}

impl Indicator for MarubozuDetector {
    type Value = i32;

    fn name(&self) -> &'static str {
        "MARUBOZU"
    }

    fn min_candles(&self) -> usize {
        1
    }

    fn live_window(&self) -> Option<usize> {
        Some(1)
    }

    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<i32> {
        let body = self.body.fraction();
        let sensitivity = self.sensitivity.fraction();

        candles
            .iter()
            .map(|bar| {
                let (o, c, h, l) = (bar.open(), bar.close(), bar.high(), bar.low());
                if o < c && (c - o) / o >= body && (h - c) / c <= sensitivity {
                    1
                } else if o > c && (o - c) / o >= body && (c - l) / c <= sensitivity {
                    -1
                } else {
                    0
                }
            })
            .collect()
    }
}

// ============================================================
// PINBAR
// ============================================================

/// Pinbar: one wick dominating the candle range.
///
/// The output is a price sentinel rather than a code: `+high` for a long upper
/// wick (bearish rejection), `-low` for a long lower wick (bullish rejection),
/// `0.0` otherwise. The upper wick wins when both qualify. Use
/// [`Direction::from_pinbar`](crate::Direction::from_pinbar) to read the bias.
/// Only the newest candle is ever classified; there is no sequential form.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinbarDetector {
    /// Minimum range in percent of the low
    pub sensitivity: Percent,
    /// Minimum wick in percent of the range
    pub wick: Percent,
}

impl Default for PinbarDetector {
    fn default() -> Self {
        Self {
            sensitivity: Percent::new_const(0.5),
            wick: Percent::new_const(60.0),
        }
    }
}

impl PinbarDetector {
    /// Classify the newest candle.
    pub fn detect<T: OHLCV>(&self, candles: &[T]) -> Result<f64> {
        let bar = candles.last().ok_or(IndicatorError::InsufficientData { need: 1, got: 0 })?;
        Ok(self.classify(bar))
    }

    fn classify<T: OHLCV>(&self, bar: &T) -> f64 {
        let amp = bar.range();
        let wide = amp / bar.low() > self.sensitivity.fraction();
        let wick = self.wick.fraction();

        if bar.upper_shadow() / amp > wick && wide {
            bar.high()
        } else if bar.lower_shadow() / amp > wick && wide {
            -bar.low()
        } else {
            0.0
        }
    }
}

// ============================================================
// PARAMETERS
// ============================================================

static MARUBOZU_PARAMS: &[ParamMeta] = &[
    ParamMeta::percent(
        "body",
        0.1,
        (0.05, 1.0, 0.05),
        "Minimum body in percent of the open",
    ),
    ParamMeta::percent(
        "sensitivity",
        0.0,
        (0.0, 0.2, 0.05),
        "Maximum closing-side wick in percent of the close",
    ),
];

static PINBAR_PARAMS: &[ParamMeta] = &[
    ParamMeta::percent(
        "sensitivity",
        0.5,
        (0.25, 2.0, 0.25),
        "Minimum candle range in percent of the low",
    ),
    ParamMeta::percent(
        "wick",
        60.0,
        (50.0, 80.0, 5.0),
        "Minimum wick in percent of the candle range",
    ),
];

impl ParameterizedIndicator for MarubozuDetector {
    fn param_meta() -> &'static [ParamMeta] {
        MARUBOZU_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            body: get_percent(params, "body", 0.1)?,
            sensitivity: get_percent(params, "sensitivity", 0.0)?,
        })
    }

    fn indicator_name() -> &'static str {
        "MARUBOZU"
    }
}

impl ParameterizedIndicator for PinbarDetector {
    fn param_meta() -> &'static [ParamMeta] {
        PINBAR_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            sensitivity: get_percent(params, "sensitivity", 0.5)?,
            wick: get_percent(params, "wick", 60.0)?,
        })
    }

    fn indicator_name() -> &'static str {
        "PINBAR"
    }
}
