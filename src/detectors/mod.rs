//! Candlestick pattern detectors
//!
//! Every detector is a plain parameter struct implementing [`Indicator`](crate::Indicator),
//! so it runs in both sequential and live mode.
//!
//! # Detectors
//!
//! - **Single-bar**: Marubozu, Pinbar
//! - **Three-bar**: Engulfing (with its two-candles-back variant)
//! - **Heiken-Ashi**: plain and EMA-smoothed candles with trend flags

pub mod helpers;

/// Generate `with_defaults()` -> `Self::default()` for multiple detector types.
macro_rules! impl_with_defaults {
  ($($detector:ty),* $(,)?) => {
    $(impl $detector {
      pub fn with_defaults() -> Self { Self::default() }
    })*
  };
}

pub mod heiken_ashi;
pub mod single_bar;
pub mod three_bar;

// Re-export all detectors for convenience
pub use heiken_ashi::*;
pub use helpers::*;
pub use single_bar::*;
pub use three_bar::*;
