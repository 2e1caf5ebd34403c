//! Position sizing from a risk budget.
//!
//! Sizes are in quote currency, quantities in base units. Nothing here clamps
//! to an available balance.

use crate::{IndicatorError, Result};

/// Position size risking `risk_percentage` of `capital` between `entry` and `stop`.
///
/// `(risk_percentage / 100 * capital) / |entry - stop| * entry`
pub fn risk_to_size(capital: f64, risk_percentage: f64, entry: f64, stop: f64) -> Result<f64> {
    let risk_per_qty = (entry - stop).abs();
    if risk_per_qty == 0.0 {
        return Err(IndicatorError::InvalidArgument(
            "risk cannot be zero: entry equals stop".to_string(),
        ));
    }
    Ok((risk_percentage / 100.0 * capital) / risk_per_qty * entry)
}

/// Quantity bought with `size` at `entry`, reserving three fees.
#[inline]
pub fn size_to_qty(size: f64, entry: f64, fee_rate: f64) -> f64 {
    size / entry * (1.0 - fee_rate * 3.0)
}

/// [`risk_to_size`] followed by [`size_to_qty`].
///
/// ```rust
/// use candlewick::sizing::risk_to_qty;
///
/// assert_eq!(risk_to_qty(1000.0, 10.0, 100.0, 90.0, 0.0).unwrap(), 10.0);
/// ```
pub fn risk_to_qty(
    capital: f64,
    risk_percentage: f64,
    entry: f64,
    stop: f64,
    fee_rate: f64,
) -> Result<f64> {
    let size = risk_to_size(capital, risk_percentage, entry, stop)?;
    let qty = size_to_qty(size, entry, fee_rate);
    tracing::trace!(capital, risk_percentage, entry, stop, size, qty, "risk sizing");
    Ok(qty)
}

// ============================================================
// CONFIGURED SIZING
// ============================================================

/// Exchange-specific sizing settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct SizingConfig {
    /// Taker fee as a fraction (`0.0004` = 0.04 %)
    #[serde(default)]
    pub fee_rate: f64,
    /// Decimal places quantities are floored to
    #[serde(default)]
    pub precision: Option<u32>,
}

impl SizingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fee_rate.is_finite() {
            return Err(IndicatorError::InvalidValue("fee_rate must be finite"));
        }
        if !(0.0..=1.0).contains(&self.fee_rate) {
            return Err(IndicatorError::OutOfRange {
                field: "fee_rate",
                value: self.fee_rate,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }

    /// Round a quantity down to the configured precision.
    ///
    /// A few ulps of tolerance keep quantities that are already on the grid,
    /// such as `0.29` whose scaled value is `28.999999999999996`, from
    /// dropping a step.
    pub fn floor_qty(&self, qty: f64) -> f64 {
        match self.precision {
            Some(precision) => {
                let factor = 10f64.powi(precision as i32);
                ((qty * factor) * (1.0 + 4.0 * f64::EPSILON)).floor() / factor
            }
            None => qty,
        }
    }

    pub fn size_to_qty(&self, size: f64, entry: f64) -> Result<f64> {
        self.validate()?;
        Ok(self.floor_qty(size_to_qty(size, entry, self.fee_rate)))
    }

    pub fn risk_to_qty(&self, capital: f64, risk_percentage: f64, entry: f64, stop: f64) -> Result<f64> {
        self.validate()?;
        let qty = risk_to_qty(capital, risk_percentage, entry, stop, self.fee_rate)?;
        Ok(self.floor_qty(qty))
    }
}
