//! # candlewick - dual-mode candle indicators
//!
//! Pure, stateless indicator and candlestick-pattern functions over OHLC series.
//! Every indicator can run over the whole history (sequential mode, one output per
//! candle) or return only the newest value (live mode). Both modes share one
//! series-producing core, so the newest sequential value always equals the live one.
//!
//! ## Quick Start
//!
//! ```rust
//! use candlewick::prelude::*;
//!
//! // Rows in the fixed column layout [timestamp, open, close, high, low, volume]
//! let rows = [
//!     [0.0, 100.0, 100.5, 101.0, 99.5, 10.0],
//!     [1.0, 101.0, 100.0, 101.5, 99.5, 10.0],
//!     [2.0, 99.8, 102.0, 102.2, 99.7, 10.0],
//! ];
//! let candles: Vec<Candle> = rows
//!     .iter()
//!     .map(|row| Candle::from_row(row))
//!     .collect::<Result<_>>()
//!     .unwrap();
//!
//! let engulfing = EngulfingDetector::with_defaults();
//! let codes = engulfing.sequential(&candles).unwrap();
//! assert_eq!(codes.last().copied(), Some(1));
//! assert_eq!(engulfing.live(&candles).unwrap(), 1);
//! ```

pub mod deriv;
pub mod detectors;
pub mod extrema;
pub mod params;
pub mod series;
pub mod signals;
pub mod sizing;
pub mod source;
pub mod timeframe;

pub mod prelude {
    pub use crate::{
        // Finite differences
        deriv::{deriv, deriv_last, Deriv},
        // Detectors
        detectors::*,
        // Rolling extrema
        extrema::{
            high, high_last, low, low_last, pivot_high, pivot_high_last, pivot_low,
            pivot_low_last, RollingHigh, RollingLow,
        },
        // Parameters
        params::{get_offset, get_percent, get_period, ParamMeta, ParamType, ParameterizedIndicator},
        // Parallel
        scan_parallel,
        // Shift primitive
        series::{shift, shift_with},
        // Signal history
        signals::{last_signal, last_signal_in_range, SignalHistory, SignalHit},
        // Sizing
        sizing::{risk_to_qty, risk_to_size, size_to_qty, SizingConfig},
        // Candle accessor
        source::{slice_candles, source, Source},
        // Timeframes
        timeframe::{zoom_timeframe, Timeframe},
        // Types
        Candle,
        Direction,
        // Core traits
        Indicator,
        // Errors
        IndicatorError,
        OHLCVExt,
        Output,
        Percent,
        Period,
        Result,
        ScanError,
        ScanResult,
        Window,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Errors raised before any computation starts.
///
/// Numeric degeneracy (division by zero, NaN inputs) is never an error: it
/// propagates through the outputs as NaN or infinity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient data: need {need} candles, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Non-negative threshold expressed in percent (`0.5` means 0.5 %).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    /// Create a new Percent, validating the value is finite and >= 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(IndicatorError::InvalidValue(
                "Percent cannot be NaN or infinite",
            ));
        }
        if value < 0.0 {
            return Err(IndicatorError::OutOfRange {
                field: "Percent",
                value,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(Self(value))
    }

    /// Create a Percent from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// The threshold as a plain fraction (`value / 100`).
    #[inline]
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }
}

impl serde::Serialize for Percent {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Percent {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Percent::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(IndicatorError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

/// Lookback/lookahead range `[i - past, i + future]`, inclusive on both ends.
///
/// A negative `future` stops short of the current candle, e.g. to keep unclosed
/// candles out of a support/resistance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Window {
    past: usize,
    future: isize,
}

impl Window {
    /// Create a new Window, validating that it covers at least one candle
    pub fn new(past: usize, future: isize) -> Result<Self> {
        let past_signed = isize::try_from(past)
            .map_err(|_| IndicatorError::InvalidValue("Window past offset is too large"))?;
        match past_signed.checked_add(future) {
            Some(span) if span >= 0 && span < isize::MAX => Ok(Self { past, future }),
            _ => Err(IndicatorError::InvalidArgument(format!(
                "empty window: past = {past}, future = {future}"
            ))),
        }
    }

    /// Unchecked constructor for library defaults; the window must be non-empty.
    pub(crate) const fn new_const(past: usize, future: isize) -> Self {
        debug_assert!(past as isize + future >= 0);
        Self { past, future }
    }

    #[inline]
    pub fn past(self) -> usize {
        self.past
    }

    #[inline]
    pub fn future(self) -> isize {
        self.future
    }

    /// Number of candles covered by the window (`past + future + 1`).
    #[inline]
    pub fn len(self) -> usize {
        (self.past as isize + self.future + 1) as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        false
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new_const(20, 0)
    }
}

impl<'de> serde::Deserialize<'de> for Window {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct RawWindow {
            past: usize,
            future: isize,
        }

        let raw = RawWindow::deserialize(d)?;
        Window::new(raw.past, raw.future).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn hl2(&self) -> f64 {
        (self.high() + self.low()) / 2.0
    }

    #[inline]
    fn hlc3(&self) -> f64 {
        (self.high() + self.low() + self.close()) / 3.0
    }

    #[inline]
    fn ohlc4(&self) -> f64 {
        (self.open() + self.high() + self.low() + self.close()) / 4.0
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// CANDLE RECORD
// ============================================================

/// One candle in the provider's fixed column layout
/// `[timestamp, open, close, high, low, volume]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

impl Candle {
    /// Number of leading columns a provider row must carry.
    pub const COLUMNS: usize = 6;

    /// Build a candle from a provider row; extra trailing columns are ignored.
    pub fn from_row(row: &[f64]) -> Result<Self> {
        match *row {
            [timestamp, open, close, high, low, volume, ..] => Ok(Self {
                timestamp: timestamp as i64,
                open,
                close,
                high,
                low,
                volume,
            }),
            _ => Err(IndicatorError::InvalidCandle {
                index: 0,
                reason: "row has fewer than 6 columns",
            }),
        }
    }

    /// Convert a whole provider table, reporting the first short row.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Vec<Self>> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                Self::from_row(row.as_ref()).map_err(|e| match e {
                    IndicatorError::InvalidCandle { reason, .. } => {
                        IndicatorError::InvalidCandle { index: i, reason }
                    }
                    other => other,
                })
            })
            .collect()
    }
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

// ============================================================
// DIRECTION
// ============================================================

/// Direction/bias of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }

    /// Direction of a signed pattern code (engulfing, marubozu).
    pub fn from_code(code: i32) -> Self {
        match code.signum() {
            1 => Direction::Bullish,
            -1 => Direction::Bearish,
            _ => Direction::Neutral,
        }
    }

    /// Direction of a sentinel-encoded signal.
    ///
    /// The pinbar detector returns `+high` for a bearish pin and `-low` for a
    /// bullish one, so the sign is inverted here. Non-finite values are neutral.
    pub fn from_pinbar(value: f64) -> Self {
        if !value.is_finite() || value == 0.0 {
            Direction::Neutral
        } else if value > 0.0 {
            Direction::Bearish
        } else {
            Direction::Bullish
        }
    }
}

// ============================================================
// INDICATOR TRAIT
// ============================================================

/// Result of [`Indicator::evaluate`]: a full aligned series or the newest value.
#[derive(Debug, Clone, PartialEq)]
pub enum Output<V> {
    Series(Vec<V>),
    Value(V),
}

impl<V: Copy> Output<V> {
    /// Newest value regardless of mode.
    pub fn last(&self) -> Option<V> {
        match self {
            Output::Series(values) => values.last().copied(),
            Output::Value(value) => Some(*value),
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, Output::Series(_))
    }
}

/// Dual-mode candle indicator.
///
/// Implementors only provide the series-producing core ([`Indicator::compute`]);
/// the sequential and live entry points validate the input and share that core.
/// Live mode runs the core over the trailing [`Indicator::live_window`] candles
/// and keeps the last element.
pub trait Indicator: Send + Sync {
    type Value: Copy + Send + Sync;

    fn name(&self) -> &'static str;

    /// Minimum candles before either mode will evaluate.
    fn min_candles(&self) -> usize;

    /// Trailing candles the newest value depends on; `None` for the whole history.
    fn live_window(&self) -> Option<usize>;

    fn validate_config(&self) -> Result<()> {
        Ok(())
    }

    /// One value per candle, aligned with the input. Does not validate.
    fn compute<T: OHLCV>(&self, candles: &[T]) -> Vec<Self::Value>;

    /// Full aligned output series.
    fn sequential<T: OHLCV>(&self, candles: &[T]) -> Result<Vec<Self::Value>> {
        check_input(self, candles.len())?;
        let candles = source::slice_candles(candles, true, self.live_window());
        Ok(self.compute(candles))
    }

    /// Newest value only.
    fn live<T: OHLCV>(&self, candles: &[T]) -> Result<Self::Value> {
        check_input(self, candles.len())?;
        let tail = source::slice_candles(candles, false, self.live_window());
        source::last_of(self.compute(tail))
    }

    /// Dispatch on an evaluation-mode flag.
    fn evaluate<T: OHLCV>(&self, candles: &[T], sequential: bool) -> Result<Output<Self::Value>> {
        if sequential {
            self.sequential(candles).map(Output::Series)
        } else {
            self.live(candles).map(Output::Value)
        }
    }
}

fn check_input<I: Indicator + ?Sized>(indicator: &I, got: usize) -> Result<()> {
    indicator.validate_config()?;
    source::ensure_len(got, indicator.min_candles()).inspect_err(|_| {
        tracing::debug!(
            indicator = indicator.name(),
            need = indicator.min_candles(),
            got,
            "evaluation rejected"
        );
    })
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of evaluating a single instrument
#[derive(Debug)]
pub struct ScanResult<V> {
    pub symbol: String,
    pub output: Output<V>,
}

/// Error from evaluating a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: IndicatorError,
}

/// Evaluate one indicator over many instruments in parallel
pub fn scan_parallel<'a, I, T, It>(
    indicator: &I,
    instruments: It,
    sequential: bool,
) -> (Vec<ScanResult<I::Value>>, Vec<ScanError>)
where
    I: Indicator,
    T: OHLCV + Sync + 'a,
    It: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, candles)| {
            indicator
                .evaluate(candles, sequential)
                .map(|output| ScanResult {
                    symbol: symbol.to_string(),
                    output,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    tracing::debug!(
        indicator = indicator.name(),
        ok = successes.len(),
        failed = errors.len(),
        "parallel scan finished"
    );

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{EngulfingDetector, MarubozuDetector};

    /// Test OHLCV bar
    #[derive(Debug, Clone)]
    struct Bar {
        o: f64,
        h: f64,
        l: f64,
        c: f64,
    }

    impl Bar {
        fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
            Self { o, h, l, c }
        }
    }

    impl OHLCV for Bar {
        fn open(&self) -> f64 {
            self.o
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.c
        }

        fn volume(&self) -> f64 {
            1000.0
        }
    }

    fn make_uptrend_bars() -> Vec<Bar> {
        (0..20)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                Bar::new(base, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect()
    }

    #[test]
    fn test_percent_validation() {
        assert!(Percent::new(0.0).is_ok());
        assert!(Percent::new(60.0).is_ok());
        assert!(Percent::new(250.0).is_ok());
        assert!(Percent::new(-0.1).is_err());
        assert!(Percent::new(f64::NAN).is_err());
        assert!(Percent::new(f64::INFINITY).is_err());
        assert_eq!(Percent::new(0.5).unwrap().fraction(), 0.5 / 100.0);
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_window_validation() {
        assert_eq!(Window::new(20, 0).unwrap().len(), 21);
        assert_eq!(Window::new(5, -2).unwrap().len(), 4);
        assert_eq!(Window::new(3, -3).unwrap().len(), 1);
        assert!(matches!(
            Window::new(2, -3),
            Err(IndicatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_window_serde_rejects_empty() {
        let w: Window = serde_json::from_str(r#"{"past":5,"future":-2}"#).unwrap();
        assert_eq!(w.len(), 4);
        assert!(serde_json::from_str::<Window>(r#"{"past":2,"future":-3}"#).is_err());
        assert_eq!(Window::default().len(), 21);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_window_new_const_asserts_non_empty() {
        let _ = Window::new_const(2, -3);
    }

    #[test]
    fn test_ohlcv_ext() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.range(), 20.0);
        assert_eq!(bar.upper_shadow(), 5.0);
        assert_eq!(bar.lower_shadow(), 10.0);
        assert_eq!(bar.hl2(), 100.0);
        assert_eq!(bar.ohlc4(), 101.25);
    }

    #[test]
    fn test_nan_candle_is_not_an_error() {
        let mut bars = make_uptrend_bars();
        bars.push(Bar::new(f64::NAN, 150.0, 140.0, 145.0));
        assert_eq!(MarubozuDetector::with_defaults().live(&bars), Ok(0));
        assert_eq!(EngulfingDetector::with_defaults().live(&bars), Ok(0));
    }

    #[test]
    fn test_candle_from_row() {
        let candle = Candle::from_row(&[1_700_000_000_000.0, 1.0, 2.0, 3.0, 0.5, 42.0, 7.0]).unwrap();
        assert_eq!(candle.timestamp, 1_700_000_000_000);
        assert_eq!(candle.open(), 1.0);
        assert_eq!(candle.close(), 2.0);
        assert_eq!(candle.high(), 3.0);
        assert_eq!(candle.low(), 0.5);
        assert_eq!(candle.volume(), 42.0);
        assert_eq!(candle.timestamp(), Some(1_700_000_000_000));

        assert!(Candle::from_row(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_candle_from_rows_reports_index() {
        let rows: Vec<Vec<f64>> = vec![vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0], vec![1.0, 2.0]];
        assert!(matches!(
            Candle::from_rows(&rows),
            Err(IndicatorError::InvalidCandle { index: 1, .. })
        ));
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(Direction::from_code(2), Direction::Bullish);
        assert_eq!(Direction::from_code(-1), Direction::Bearish);
        assert_eq!(Direction::from_code(0), Direction::Neutral);
        assert_eq!(Direction::from_pinbar(105.0), Direction::Bearish);
        assert_eq!(Direction::from_pinbar(-95.0), Direction::Bullish);
        assert_eq!(Direction::from_pinbar(0.0), Direction::Neutral);
        assert_eq!(Direction::from_pinbar(f64::NAN), Direction::Neutral);
    }

    #[test]
    fn test_evaluate_dispatch() {
        let bars = make_uptrend_bars();
        let detector = MarubozuDetector::with_defaults();

        let series = detector.evaluate(&bars, true).unwrap();
        let value = detector.evaluate(&bars, false).unwrap();
        assert!(series.is_series());
        assert!(!value.is_series());
        assert_eq!(series.last(), value.last());
    }

    #[test]
    fn test_insufficient_data_rejected_in_both_modes() {
        let bars = vec![Bar::new(100.0, 101.0, 99.0, 100.5); 2];
        let detector = EngulfingDetector::with_defaults();
        let expected = IndicatorError::InsufficientData { need: 3, got: 2 };
        assert_eq!(detector.sequential(&bars), Err(expected.clone()));
        assert_eq!(detector.live(&bars), Err(expected));
    }

    #[test]
    fn test_parallel_scan() {
        let detector = MarubozuDetector::with_defaults();

        let bars1 = make_uptrend_bars();
        let bars2: Vec<Bar> = Vec::new();

        let instruments: Vec<(&str, &[Bar])> = vec![("BTC-USDT", &bars1), ("ETH-USDT", &bars2)];

        let (results, errors) = scan_parallel(&detector, instruments, false);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "BTC-USDT");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].symbol, "ETH-USDT");
        assert_eq!(
            errors[0].error,
            IndicatorError::InsufficientData { need: 1, got: 0 }
        );
    }
}
