//! Rolling extrema over a `(past, future)` window and pivot detection.
//!
//! For every index `i` the window covers `series[i - past ..= i + future]`.
//! A window that leaves the series, or that holds a NaN, yields NaN; this is the
//! result of the reference formulation, which takes the elementwise minimum of
//! the series shifted by every offset in the window with NaN fill.
//!
//! # Algorithm
//!
//! The reduction runs as a trailing window of width `past + future + 1` over a
//! monotonic deque of indices, then re-aligns the trailing result by `future`.
//! Each index enters and leaves the deque once, so a full pass is O(n) no matter
//! how wide the window is.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::{
    params::{get_offset, ParamMeta, ParameterizedIndicator},
    source::{ensure_len, last_of, source, Source},
    Indicator, IndicatorError, Result, Window, OHLCV,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Min,
    Max,
}

impl Extremum {
    /// Whether `candidate` makes `incumbent` useless for every later window.
    #[inline]
    fn dominates(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Extremum::Min => candidate <= incumbent,
            Extremum::Max => candidate >= incumbent,
        }
    }
}

/// Trailing extremum of width `width` ending at each index.
fn trailing_extrema(series: &[f64], width: usize, extremum: Extremum) -> Vec<f64> {
    let mut out = vec![f64::NAN; series.len()];
    let mut deque: VecDeque<usize> = VecDeque::with_capacity(width);
    let mut last_nan: Option<usize> = None;

    for (i, &value) in series.iter().enumerate() {
        if value.is_nan() {
            last_nan = Some(i);
        } else {
            while let Some(&back) = deque.back() {
                if extremum.dominates(value, series[back]) {
                    deque.pop_back();
                } else {
                    break;
                }
            }
            deque.push_back(i);
        }

        if i + 1 < width {
            continue;
        }
        let start = i + 1 - width;
        while deque.front().is_some_and(|&front| front < start) {
            deque.pop_front();
        }
        if last_nan.is_some_and(|k| k >= start) {
            continue;
        }
        if let Some(&front) = deque.front() {
            out[i] = series[front];
        }
    }

    out
}

fn rolling(series: &[f64], window: Window, extremum: Extremum) -> Vec<f64> {
    let n = series.len();
    let trailing = trailing_extrema(series, window.len(), extremum);

    (0..n)
        .map(|i| {
            if i < window.past() {
                return f64::NAN;
            }
            match (i as isize)
                .checked_add(window.future())
                .and_then(|end| usize::try_from(end).ok())
            {
                Some(end) if end < n => trailing[end],
                _ => f64::NAN,
            }
        })
        .collect()
}

/// Trailing slice the newest windowed value depends on.
#[inline]
fn live_tail(series: &[f64], window: Window) -> &[f64] {
    &series[series.len().saturating_sub(window.past() + 1)..]
}

/// Windowed minimum at every index.
pub fn low(series: &[f64], window: Window) -> Result<Vec<f64>> {
    ensure_len(series.len(), window.len())?;
    Ok(rolling(series, window, Extremum::Min))
}

/// Windowed minimum at the newest index.
pub fn low_last(series: &[f64], window: Window) -> Result<f64> {
    ensure_len(series.len(), window.len())?;
    last_of(rolling(live_tail(series, window), window, Extremum::Min))
}

/// Windowed maximum at every index.
pub fn high(series: &[f64], window: Window) -> Result<Vec<f64>> {
    ensure_len(series.len(), window.len())?;
    Ok(rolling(series, window, Extremum::Max))
}

/// Windowed maximum at the newest index.
pub fn high_last(series: &[f64], window: Window) -> Result<f64> {
    ensure_len(series.len(), window.len())?;
    last_of(rolling(live_tail(series, window), window, Extremum::Max))
}

/// `true` where the value equals the windowed minimum; plateaus count.
pub fn pivot_low(series: &[f64], window: Window) -> Result<Vec<bool>> {
    let lows = low(series, window)?;
    Ok(series.iter().zip(&lows).map(|(v, l)| v == l).collect())
}

pub fn pivot_low_last(series: &[f64], window: Window) -> Result<bool> {
    let l = low_last(series, window)?;
    Ok(series.last().is_some_and(|&v| v == l))
}

/// `true` where the value equals the windowed maximum; plateaus count.
pub fn pivot_high(series: &[f64], window: Window) -> Result<Vec<bool>> {
    let highs = high(series, window)?;
    Ok(series.iter().zip(&highs).map(|(v, h)| v == h).collect())
}

pub fn pivot_high_last(series: &[f64], window: Window) -> Result<bool> {
    let h = high_last(series, window)?;
    Ok(series.last().is_some_and(|&v| v == h))
}

// ============================================================
// CANDLE INDICATORS
// ============================================================

/// Lowest value of a candle source over a window.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RollingLow {
    pub window: Window,
    pub source: Source,
}

impl Default for RollingLow {
    fn default() -> Self {
        Self {
            window: Window::default(),
            source: Source::Low,
        }
    }
}

/// Highest value of a candle source over a window.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RollingHigh {
    pub window: Window,
    pub source: Source,
}

impl Default for RollingHigh {
    fn default() -> Self {
        Self {
            window: Window::default(),
            source: Source::High,
        }
    }
}

impl Indicator for RollingLow {
    type Value = f64;

    fn name(&self) -> &'static str {
        "ROLLING_LOW"
    }

    fn min_candles(&self) -> usize {
        self.window.len()
    }

    fn live_window(&self) -> Option<usize> {
        Some(self.window.past() + 1)
    }

    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<f64> {
        rolling(&source(candles, self.source), self.window, Extremum::Min)
    }
}

impl Indicator for RollingHigh {
    type Value = f64;

    fn name(&self) -> &'static str {
        "ROLLING_HIGH"
    }

    fn min_candles(&self) -> usize {
        self.window.len()
    }

    fn live_window(&self) -> Option<usize> {
        Some(self.window.past() + 1)
    }

    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<f64> {
        rolling(&source(candles, self.source), self.window, Extremum::Max)
    }
}

static WINDOW_PARAMS: &[ParamMeta] = &[
    ParamMeta::offset(
        "past",
        20.0,
        (1.0, 100.0, 1.0),
        "Candles to look back from the current one",
    ),
    ParamMeta::offset(
        "future",
        0.0,
        (-10.0, 10.0, 1.0),
        "Candles to look ahead; negative stops short of the current one",
    ),
];

fn window_from_params(params: &HashMap<&str, f64>) -> Result<Window> {
    let past = get_offset(params, "past", 20)?;
    let future = get_offset(params, "future", 0)?;
    let past = usize::try_from(past).map_err(|_| IndicatorError::OutOfRange {
        field: "past",
        value: past as f64,
        min: 0.0,
        max: f64::INFINITY,
    })?;
    Window::new(past, future)
}

impl ParameterizedIndicator for RollingLow {
    fn param_meta() -> &'static [ParamMeta] {
        WINDOW_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            window: window_from_params(params)?,
            source: Source::Low,
        })
    }

    fn indicator_name() -> &'static str {
        "ROLLING_LOW"
    }
}

impl ParameterizedIndicator for RollingHigh {
    fn param_meta() -> &'static [ParamMeta] {
        WINDOW_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            window: window_from_params(params)?,
            source: Source::High,
        })
    }

    fn indicator_name() -> &'static str {
        "ROLLING_HIGH"
    }
}
