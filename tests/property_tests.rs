//! Property-based tests using proptest.
//!
//! The central property is mode consistency: for every indicator the newest
//! value of a sequential run equals the live value, bit for bit.

use proptest::prelude::*;

use candlewick::prelude::*;

// ==================== Test Data Generators ====================

/// Generate a random positive series
fn arb_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..=max_len)
}

/// Generate a random candle series with high >= open, close >= low
fn arb_candles(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(
        (10.0..1000.0_f64, -0.05..0.05_f64, 0.0..0.05_f64, 0.0..0.05_f64),
        min_len..=max_len,
    )
    .prop_map(|data| {
        data.into_iter()
            .enumerate()
            .map(|(i, (open, change, up, down))| {
                let close = open * (1.0 + change);
                Candle {
                    timestamp: i as i64,
                    open,
                    close,
                    high: open.max(close) * (1.0 + up),
                    low: open.min(close) * (1.0 - down),
                    volume: 1.0,
                }
            })
            .collect()
    })
}

fn arb_window() -> impl Strategy<Value = Window> {
    (0usize..8, -4isize..4).prop_filter_map("empty window", |(past, future)| {
        Window::new(past, future).ok()
    })
}

/// Equality that treats NaN as equal to NaN.
fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

// ==================== Mode Consistency ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_engulfing_modes_agree(candles in arb_candles(3, 60), size in 0.0..3.0_f64) {
        let detector = EngulfingDetector { size: Percent::new(size).unwrap() };
        let series = detector.sequential(&candles).unwrap();
        prop_assert_eq!(series.len(), candles.len());
        prop_assert_eq!(series.last().copied(), Some(detector.live(&candles).unwrap()));
    }

    #[test]
    fn prop_heiken_ashi_modes_agree(candles in arb_candles(1, 60)) {
        let detector = HeikenAshiDetector::with_defaults();
        let series = detector.sequential(&candles).unwrap();
        prop_assert_eq!(series.last().copied(), Some(detector.live(&candles).unwrap()));
    }

    #[test]
    fn prop_smoothed_heiken_ashi_modes_agree(
        candles in arb_candles(10, 80),
        len1 in 1usize..6,
        len2 in 1usize..4
    ) {
        let detector = SmoothedHeikenAshiDetector {
            len1: Period::new(len1).unwrap(),
            len2: Period::new(len2).unwrap(),
        };
        let newest = detector.sequential(&candles).unwrap().pop().unwrap();
        let live = detector.live(&candles).unwrap();
        prop_assert!(same(newest.open, live.open));
        prop_assert!(same(newest.close, live.close));
        prop_assert!(same(newest.high, live.high));
        prop_assert!(same(newest.low, live.low));
        prop_assert_eq!(newest.green, live.green);
    }

    #[test]
    fn prop_single_bar_modes_agree(candles in arb_candles(1, 40)) {
        let marubozu = MarubozuDetector::with_defaults();
        prop_assert_eq!(
            marubozu.sequential(&candles).unwrap().last().copied(),
            Some(marubozu.live(&candles).unwrap())
        );

        let pinbar = PinbarDetector::with_defaults();
        let newest = pinbar.detect(&candles).unwrap();
        prop_assert!(same(newest, pinbar.detect(&candles[candles.len() - 1..]).unwrap()));
    }

    #[test]
    fn prop_rolling_extrema_modes_agree(series in arb_series(12, 60), window in arb_window()) {
        let lows = low(&series, window).unwrap();
        let highs = high(&series, window).unwrap();
        prop_assert!(same(lows[lows.len() - 1], low_last(&series, window).unwrap()));
        prop_assert!(same(highs[highs.len() - 1], high_last(&series, window).unwrap()));

        let pivots = pivot_low(&series, window).unwrap();
        prop_assert_eq!(pivots[pivots.len() - 1], pivot_low_last(&series, window).unwrap());
        let pivots = pivot_high(&series, window).unwrap();
        prop_assert_eq!(pivots[pivots.len() - 1], pivot_high_last(&series, window).unwrap());
    }

    #[test]
    fn prop_rolling_candle_indicators_agree(candles in arb_candles(12, 50), window in arb_window()) {
        let indicator = RollingLow { window, source: Source::Low };
        let newest = indicator.sequential(&candles).unwrap().pop().unwrap();
        prop_assert!(same(newest, indicator.live(&candles).unwrap()));

        let indicator = RollingHigh { window, source: Source::Hl2 };
        let newest = indicator.sequential(&candles).unwrap().pop().unwrap();
        prop_assert!(same(newest, indicator.live(&candles).unwrap()));
    }

    #[test]
    fn prop_deriv_modes_agree(series in arb_series(1, 60)) {
        let all = deriv(&series).unwrap();
        let last = deriv_last(&series).unwrap();
        let newest = all[all.len() - 1];
        prop_assert!(same(newest.first, last.first));
        prop_assert!(same(newest.second, last.second));
        prop_assert!(same(newest.third, last.third));
        prop_assert!(same(newest.double, last.double));
        prop_assert!(same(newest.triple, last.triple));
    }

    #[test]
    fn prop_signal_history_newest_matches_lookup(
        data in prop::collection::vec((1.0..100.0_f64, any::<bool>()), 1..60),
        range_down in 0usize..5,
        span in 0usize..20
    ) {
        let (osc, signal): (Vec<f64>, Vec<bool>) = data.into_iter().unzip();
        let range_up = range_down + span;
        let history = last_signal_in_range(&osc, &signal, range_down, range_up).unwrap();
        let newest = last_signal(&osc, &signal, range_down, range_up).unwrap();
        prop_assert_eq!(history.get(history.len() - 1), newest);

        if let Some(hit) = newest {
            prop_assert!(hit.distance >= range_down);
            prop_assert!(hit.distance < range_up);
            prop_assert!(signal[osc.len() - 1 - hit.distance]);
        }
    }
}

// ==================== Shift Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_shift_remaps_indices(series in arb_series(0, 50), offset in -60isize..60) {
        let shifted = shift(&series, offset);
        prop_assert_eq!(shifted.len(), series.len());
        for (i, value) in shifted.iter().enumerate() {
            let src = i as isize - offset;
            if src >= 0 && (src as usize) < series.len() {
                prop_assert_eq!(*value, series[src as usize]);
            } else {
                prop_assert!(value.is_nan());
            }
        }
    }

    #[test]
    fn prop_shift_zero_is_identity(series in arb_series(0, 50)) {
        prop_assert_eq!(shift(&series, 0), series);
    }

    #[test]
    fn prop_shift_with_composes(series in arb_series(0, 40), a in -10isize..10, b in -10isize..10) {
        // same-sign offsets never pull a fill value back into range
        prop_assume!(a.signum() * b.signum() >= 0);
        let chained = shift_with(&shift_with(&series, a, 0.0), b, 0.0);
        prop_assert_eq!(chained, shift_with(&series, a + b, 0.0));
    }
}

// ==================== Extrema Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_increasing_series_bounds(len in 10usize..60, past in 0usize..6, future in 0isize..4) {
        let series: Vec<f64> = (0..len).map(|i| 1.0 + i as f64).collect();
        let window = Window::new(past, future).unwrap();
        let lows = low(&series, window).unwrap();
        let highs = high(&series, window).unwrap();

        for i in past..len.saturating_sub(future as usize) {
            prop_assert_eq!(lows[i], series[i - past]);
            prop_assert_eq!(highs[i], series[i + future as usize]);
        }
    }

    #[test]
    fn prop_extrema_bound_the_series(series in arb_series(12, 60), window in arb_window()) {
        let lows = low(&series, window).unwrap();
        let highs = high(&series, window).unwrap();
        for i in 0..series.len() {
            if lows[i].is_nan() {
                prop_assert!(highs[i].is_nan());
                continue;
            }
            prop_assert!(lows[i] <= highs[i]);
            if window.future() >= 0 {
                prop_assert!(lows[i] <= series[i]);
                prop_assert!(highs[i] >= series[i]);
            }
        }
    }

    #[test]
    fn prop_single_minimum_is_only_pivot(
        mut series in prop::collection::vec(10.0..100.0_f64, 15..40),
        k_frac in 0.0..1.0_f64,
        past in 1usize..5,
        future in 0isize..4
    ) {
        let n = series.len();
        let window = Window::new(past, future).unwrap();
        let f = future as usize;
        prop_assume!(n > past + f);
        let k = past + ((n - past - f - 1) as f64 * k_frac) as usize;
        series[k] = 1.0;

        let pivots = pivot_low(&series, window).unwrap();
        prop_assert!(pivots[k]);
        for j in k.saturating_sub(f)..=(k + past).min(n - 1) {
            if j != k {
                prop_assert!(!pivots[j], "neighbour {} flagged as pivot", j);
            }
        }
    }
}
