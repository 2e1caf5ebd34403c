//! Candle timeframes and the zoom map used to pick a finer timeframe for
//! intra-candle detail.

use std::{fmt, str::FromStr};

use crate::{IndicatorError, Result};

/// Exchange candle timeframe, keyed by its conventional string (`"1h"`, `"1D"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "45m")]
    Minute45,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "3h")]
    Hour3,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "8h")]
    Hour8,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1D")]
    Day1,
    #[serde(rename = "3D")]
    Day3,
    #[serde(rename = "1W")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 17] = [
        Timeframe::Minute1,
        Timeframe::Minute3,
        Timeframe::Minute5,
        Timeframe::Minute15,
        Timeframe::Minute30,
        Timeframe::Minute45,
        Timeframe::Hour1,
        Timeframe::Hour2,
        Timeframe::Hour3,
        Timeframe::Hour4,
        Timeframe::Hour6,
        Timeframe::Hour8,
        Timeframe::Hour12,
        Timeframe::Day1,
        Timeframe::Day3,
        Timeframe::Week1,
        Timeframe::Month1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute3 => "3m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Minute45 => "45m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour2 => "2h",
            Timeframe::Hour3 => "3h",
            Timeframe::Hour4 => "4h",
            Timeframe::Hour6 => "6h",
            Timeframe::Hour8 => "8h",
            Timeframe::Hour12 => "12h",
            Timeframe::Day1 => "1D",
            Timeframe::Day3 => "3D",
            Timeframe::Week1 => "1W",
            Timeframe::Month1 => "1M",
        }
    }

    /// Length of one candle in minutes; a month counts as 30 days.
    pub fn minutes(self) -> u32 {
        match self {
            Timeframe::Minute1 => 1,
            Timeframe::Minute3 => 3,
            Timeframe::Minute5 => 5,
            Timeframe::Minute15 => 15,
            Timeframe::Minute30 => 30,
            Timeframe::Minute45 => 45,
            Timeframe::Hour1 => 60,
            Timeframe::Hour2 => 120,
            Timeframe::Hour3 => 180,
            Timeframe::Hour4 => 240,
            Timeframe::Hour6 => 360,
            Timeframe::Hour8 => 480,
            Timeframe::Hour12 => 720,
            Timeframe::Day1 => 1_440,
            Timeframe::Day3 => 4_320,
            Timeframe::Week1 => 10_080,
            Timeframe::Month1 => 43_200,
        }
    }

    /// Finer timeframe used to look inside one candle of `self`.
    pub fn zoom(self) -> Result<Timeframe> {
        let finer = match self {
            Timeframe::Minute3 | Timeframe::Minute5 => Timeframe::Minute1,
            Timeframe::Minute15 => Timeframe::Minute3,
            Timeframe::Minute30 | Timeframe::Minute45 => Timeframe::Minute5,
            Timeframe::Hour1 => Timeframe::Minute15,
            Timeframe::Hour2 => Timeframe::Minute30,
            Timeframe::Hour3 => Timeframe::Minute45,
            Timeframe::Hour4 | Timeframe::Hour6 => Timeframe::Hour1,
            Timeframe::Hour8 | Timeframe::Hour12 => Timeframe::Hour2,
            Timeframe::Day1 => Timeframe::Hour4,
            Timeframe::Day3 => Timeframe::Hour12,
            Timeframe::Week1 => Timeframe::Day1,
            Timeframe::Minute1 | Timeframe::Month1 => {
                return Err(IndicatorError::InvalidArgument(format!(
                    "no finer timeframe for '{self}'"
                )))
            }
        };
        Ok(finer)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| IndicatorError::InvalidArgument(format!("unknown timeframe '{s}'")))
    }
}

/// String-keyed [`Timeframe::zoom`].
///
/// ```rust
/// use candlewick::timeframe::zoom_timeframe;
///
/// assert_eq!(zoom_timeframe("4h").unwrap(), "1h");
/// assert!(zoom_timeframe("7h").is_err());
/// ```
pub fn zoom_timeframe(timeframe: &str) -> Result<&'static str> {
    timeframe.parse::<Timeframe>()?.zoom().map(Timeframe::as_str)
}
