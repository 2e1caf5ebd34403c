//! Shift primitive and NaN-aware elementwise helpers.
//!
//! Shifting is a single index remap: `out[i] = series[i - offset]`, with `fill`
//! wherever `i - offset` leaves the series. A positive offset delays the series
//! (looks into the past), a negative one pulls future values back.

/// Shift a numeric series, filling vacated positions with NaN.
///
/// ```rust
/// use candlewick::series::shift;
///
/// let shifted = shift(&[1.0, 2.0, 3.0], 1);
/// assert!(shifted[0].is_nan());
/// assert_eq!(&shifted[1..], &[1.0, 2.0]);
/// ```
#[inline]
pub fn shift(series: &[f64], offset: isize) -> Vec<f64> {
    shift_with(series, offset, f64::NAN)
}

/// Shift any series, filling vacated positions with `fill`.
///
/// Chaining shifts by `a` then `b` with the same fill equals one shift by `a + b`.
pub fn shift_with<T: Copy>(series: &[T], offset: isize, fill: T) -> Vec<T> {
    (0..series.len())
        .map(|i| {
            (i as isize)
                .checked_sub(offset)
                .and_then(|src| usize::try_from(src).ok())
                .and_then(|src| series.get(src).copied())
                .unwrap_or(fill)
        })
        .collect()
}

/// Minimum that propagates NaN from either side.
#[inline]
pub fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Maximum that propagates NaN from either side.
#[inline]
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
