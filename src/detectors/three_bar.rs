//! Three-bar candlestick patterns

use std::collections::HashMap;

use super::helpers::Columns;
use crate::{
    params::{get_percent, ParamMeta, ParameterizedIndicator},
    series::shift,
    Indicator, Percent, Result, OHLCV,
};

impl_with_defaults!(EngulfingDetector);

// ============================================================
// ENGULFING
// ============================================================

/// Engulfing with a two-candles-back variant.
///
/// Each candle scores the sum of four independent conditions:
///
/// | code | condition |
/// |------|-----------|
/// | `+1` | previous candle red, close clears its high, open at or under its close, gain from open above `size` |
/// | `+2` | candle two back red, close clears its high, previous candle green, gain from its open above `size` |
/// | `-1` | previous candle green, close breaks its low, open at or over its close, loss from open above `size` |
/// | `-2` | candle two back green, close breaks its low, previous candle red, loss from its open above `size` |
///
/// Codes add up, so a candle matching two conditions scores their sum.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngulfingDetector {
    /// Minimum move, in percent of the reference open
    pub size: Percent,
}

impl Default for EngulfingDetector {
    fn default() -> Self {
        Self {
            size: Percent::new_const(0.5),
        }
    }
}

impl Indicator for EngulfingDetector {
    type Value = i32;

    fn name(&self) -> &'static str {
        "ENGULFING"
    }

    fn min_candles(&self) -> usize {
        3
    }

    fn live_window(&self) -> Option<usize> {
        Some(3)
    }

    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<i32> {
        let Columns {
            open,
            close,
            high,
            low,
        } = Columns::from_candles(candles);
        let size = self.size.fraction();

        let (o1, c1, h1, l1) = (
            shift(&open, 1),
            shift(&close, 1),
            shift(&high, 1),
            shift(&low, 1),
        );
        let (o2, c2, h2, l2) = (
            shift(&open, 2),
            shift(&close, 2),
            shift(&high, 2),
            shift(&low, 2),
        );

        (0..candles.len())
            .map(|i| {
                let (o, c) = (open[i], close[i]);
                let mut code = 0;

                if o1[i] >= c1[i] && c >= h1[i] && c1[i] >= o && (c - o) / o > size {
                    code += 1;
                }
                if o2[i] >= c2[i] && c >= h2[i] && o1[i] <= c1[i] && (c - o2[i]) / o2[i] > size {
                    code += 2;
                }
                if o1[i] <= c1[i] && c <= l1[i] && c1[i] <= o && (o - c) / o > size {
                    code -= 1;
                }
                if o2[i] <= c2[i] && c <= l2[i] && o1[i] >= c1[i] && (o2[i] - c) / o2[i] > size {
                    code -= 2;
                }

                code
            })
            .collect()
    }
}

// ============================================================
// PARAMETERS
// ============================================================

static ENGULFING_PARAMS: &[ParamMeta] = &[
    ParamMeta::percent(
        "size",
        0.5,
        (0.25, 2.0, 0.25),
        "Minimum engulfing move in percent",
    ),
];

impl ParameterizedIndicator for EngulfingDetector {
    fn param_meta() -> &'static [ParamMeta] {
        ENGULFING_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            size: get_percent(params, "size", 0.5)?,
        })
    }

    fn indicator_name() -> &'static str {
        "ENGULFING"
    }
}
