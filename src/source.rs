//! Candle accessor: price-series extraction and live-mode trimming.

use std::{fmt, str::FromStr};

use crate::{IndicatorError, OHLCVExt, Result, OHLCV};

/// Logical price series extracted from a candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Open,
    #[default]
    Close,
    High,
    Low,
    Volume,
    Hl2,
    Hlc3,
    Ohlc4,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Source::Open,
        Source::Close,
        Source::High,
        Source::Low,
        Source::Volume,
        Source::Hl2,
        Source::Hlc3,
        Source::Ohlc4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Open => "open",
            Source::Close => "close",
            Source::High => "high",
            Source::Low => "low",
            Source::Volume => "volume",
            Source::Hl2 => "hl2",
            Source::Hlc3 => "hlc3",
            Source::Ohlc4 => "ohlc4",
        }
    }

    #[inline]
    pub fn extract<T: OHLCV>(self, candle: &T) -> f64 {
        match self {
            Source::Open => candle.open(),
            Source::Close => candle.close(),
            Source::High => candle.high(),
            Source::Low => candle.low(),
            Source::Volume => candle.volume(),
            Source::Hl2 => candle.hl2(),
            Source::Hlc3 => candle.hlc3(),
            Source::Ohlc4 => candle.ohlc4(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| IndicatorError::InvalidArgument(format!("unknown candle source '{s}'")))
    }
}

/// Extract one price series from a candle series.
pub fn source<T: OHLCV>(candles: &[T], source: Source) -> Vec<f64> {
    candles.iter().map(|c| source.extract(c)).collect()
}

/// Trim candles to what an evaluation needs.
///
/// Sequential evaluation keeps every candle. Live evaluation keeps the trailing
/// `live_window` candles, or all of them when the newest value depends on the
/// whole history (`None`).
pub fn slice_candles<T>(candles: &[T], sequential: bool, live_window: Option<usize>) -> &[T] {
    match live_window {
        Some(window) if !sequential => &candles[candles.len().saturating_sub(window)..],
        _ => candles,
    }
}

/// Fail with `InsufficientData` when fewer than `need` rows are available.
#[inline]
pub fn ensure_len(got: usize, need: usize) -> Result<()> {
    if got < need {
        return Err(IndicatorError::InsufficientData { need, got });
    }
    Ok(())
}

/// Newest element of a computed series.
pub(crate) fn last_of<V>(mut values: Vec<V>) -> Result<V> {
    values
        .pop()
        .ok_or(IndicatorError::InsufficientData { need: 1, got: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Candle;

    fn candles() -> Vec<Candle> {
        vec![
            Candle { timestamp: 0, open: 10.0, close: 12.0, high: 13.0, low: 9.0, volume: 5.0 },
            Candle { timestamp: 1, open: 12.0, close: 11.0, high: 14.0, low: 10.0, volume: 7.0 },
        ]
    }

    #[test]
    fn test_plain_sources() {
        let c = candles();
        assert_eq!(source(&c, Source::Open), vec![10.0, 12.0]);
        assert_eq!(source(&c, Source::Close), vec![12.0, 11.0]);
        assert_eq!(source(&c, Source::High), vec![13.0, 14.0]);
        assert_eq!(source(&c, Source::Low), vec![9.0, 10.0]);
        assert_eq!(source(&c, Source::Volume), vec![5.0, 7.0]);
    }

    #[test]
    fn test_composite_sources() {
        let c = candles();
        assert_eq!(source(&c, Source::Hl2), vec![11.0, 12.0]);
        assert_eq!(source(&c, Source::Hlc3), vec![34.0 / 3.0, 35.0 / 3.0]);
        assert_eq!(source(&c, Source::Ohlc4), vec![11.0, 11.75]);
    }

    #[test]
    fn test_source_parsing() {
        for s in Source::ALL {
            assert_eq!(s.as_str().parse::<Source>().unwrap(), s);
        }
        assert!(matches!(
            "hlcc4".parse::<Source>(),
            Err(IndicatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_source_serde_names() {
        let json = serde_json::to_string(&Source::Ohlc4).unwrap();
        assert_eq!(json, "\"ohlc4\"");
        let parsed: Source = serde_json::from_str("\"hl2\"").unwrap();
        assert_eq!(parsed, Source::Hl2);
    }

    #[test]
    fn test_slice_candles() {
        let data = [1, 2, 3, 4, 5];
        assert_eq!(slice_candles(&data, true, Some(2)), &data);
        assert_eq!(slice_candles(&data, false, Some(2)), &[4, 5]);
        assert_eq!(slice_candles(&data, false, Some(10)), &data);
        assert_eq!(slice_candles(&data, false, None), &data);
    }

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len(3, 3).is_ok());
        assert_eq!(
            ensure_len(2, 3),
            Err(IndicatorError::InsufficientData { need: 3, got: 2 })
        );
    }
}
