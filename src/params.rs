//! Parameter metadata for indicators
//!
//! This module provides metadata about indicator parameters, enabling:
//! - Grid search optimization
//! - Parameter documentation
//! - Building indicators from loosely-typed strategy hyperparameters
//!
//! # Example
//!
//! ```rust
//! use candlewick::params::{ParamMeta, ParamType, ParameterizedIndicator};
//! use candlewick::prelude::*;
//!
//! // Get parameter metadata for a detector
//! let params = PinbarDetector::param_meta();
//! for param in params {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{IndicatorError, Percent, Period, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Threshold in percent (non-negative)
  Percent,
  /// Period value (positive integer)
  Period,
  /// Signed candle offset (integer)
  Offset,
}

/// Metadata for a single indicator parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "wick")
  pub name: &'static str,
  /// Parameter type
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Percent parameter
  pub const fn percent(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Percent, default, range, description }
  }

  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Create a new ParamMeta for an Offset parameter
  pub const fn offset(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Offset, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(IndicatorError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Percent => Percent::new(value).map(|_| ()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(IndicatorError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
      ParamType::Offset => {
        if value.fract() != 0.0 {
          return Err(IndicatorError::InvalidValue("Offset must be an integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED INDICATOR TRAIT
// ============================================================

/// Trait for indicators that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of indicators with custom parameter values
/// - Grid search optimization
pub trait ParameterizedIndicator: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates an indicator with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  /// Returns the indicator name
  fn indicator_name() -> &'static str;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Percent from params with default fallback
pub fn get_percent(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Percent> {
  let value = params.get(key).copied().unwrap_or(default);
  Percent::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let Some(value) = params.get(key).copied() else {
    return Period::new(default);
  };
  if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
    return Err(IndicatorError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

/// Helper to get a signed offset from params with default fallback
pub fn get_offset(params: &HashMap<&str, f64>, key: &str, default: isize) -> Result<isize> {
  let Some(value) = params.get(key).copied() else {
    return Ok(default);
  };
  if !value.is_finite() || value.fract() != 0.0 {
    return Err(IndicatorError::InvalidValue("Offset must be an integer"));
  }
  Ok(value as isize)
}

// ============================================================
// TESTS
// ============================================================
