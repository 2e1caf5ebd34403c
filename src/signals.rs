//! Signal history lookup: the most recent candle where a boolean signal fired.
//!
//! Ranges are counted in candles ago from the newest one. A scan with
//! `(range_down, range_up)` looks at candles `range_down ..= range_up - 1`
//! ago, so `range_down == 0` includes the newest candle and `range_up` is
//! exclusive. The window is clamped at the start of the series.

use rayon::prelude::*;

use crate::{IndicatorError, Result};

/// Most recent signal found by [`last_signal`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SignalHit {
    /// Candles ago, `0` being the newest candle.
    pub distance: usize,
    /// Oscillator value at the signal candle.
    pub value: f64,
}

/// [`last_signal`] evaluated as of every candle; NaN where nothing was found.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SignalHistory {
    pub distances: Vec<f64>,
    pub values: Vec<f64>,
}

impl SignalHistory {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Entry at `index` as a hit, `None` where nothing was found.
    pub fn get(&self, index: usize) -> Option<SignalHit> {
        let distance = *self.distances.get(index)?;
        if distance.is_nan() {
            return None;
        }
        Some(SignalHit {
            distance: distance as usize,
            value: self.values[index],
        })
    }
}

fn check_lengths(osc: &[f64], signal: &[bool]) -> Result<()> {
    if osc.len() != signal.len() {
        return Err(IndicatorError::InvalidArgument(format!(
            "oscillator and signal lengths differ: {} vs {}",
            osc.len(),
            signal.len()
        )));
    }
    Ok(())
}

fn scan(osc: &[f64], signal: &[bool], range_down: usize, range_up: usize) -> Option<SignalHit> {
    let n = signal.len();
    let start = n.saturating_sub(range_up);
    let end = n.saturating_sub(range_down);
    if start >= end {
        return None;
    }

    signal[start..end]
        .iter()
        .rposition(|&fired| fired)
        .map(|offset| {
            let index = start + offset;
            SignalHit {
                distance: n - 1 - index,
                value: osc[index],
            }
        })
}

/// Most recent candle within the range where `signal` is set.
///
/// ```rust
/// use candlewick::signals::last_signal;
///
/// let osc = [10.0, 20.0, 30.0, 40.0];
/// let signal = [false, true, false, false];
/// let hit = last_signal(&osc, &signal, 0, 4).unwrap().unwrap();
/// assert_eq!(hit.distance, 2);
/// assert_eq!(hit.value, 20.0);
/// ```
pub fn last_signal(
    osc: &[f64],
    signal: &[bool],
    range_down: usize,
    range_up: usize,
) -> Result<Option<SignalHit>> {
    check_lengths(osc, signal)?;
    Ok(scan(osc, signal, range_down, range_up))
}

/// [`last_signal`] as of every candle, using only the candles up to it.
pub fn last_signal_in_range(
    osc: &[f64],
    signal: &[bool],
    range_down: usize,
    range_up: usize,
) -> Result<SignalHistory> {
    check_lengths(osc, signal)?;
    tracing::trace!(len = osc.len(), range_down, range_up, "signal history scan");

    let (distances, values) = (0..signal.len())
        .into_par_iter()
        .map(|i| match scan(&osc[..=i], &signal[..=i], range_down, range_up) {
            Some(hit) => (hit.distance as f64, hit.value),
            None => (f64::NAN, f64::NAN),
        })
        .unzip();

    Ok(SignalHistory { distances, values })
}
