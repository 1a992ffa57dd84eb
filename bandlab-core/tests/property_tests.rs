//! Property tests for the band calculator.
//!
//! Uses proptest to verify:
//! 1. Short series: fewer prices than the window leave every output undefined
//! 2. Symmetry: the bands sit at equal distance around the main line
//! 3. Ordering: upper >= main >= lower for a non-negative multiplier
//! 4. Zero multiplier: both bands collapse onto the main line
//! 5. Determinism: bar-by-bar updates match a single full pass exactly

use bandlab_core::domain::PriceSource;
use bandlab_core::indicators::AverageMode;
use bandlab_core::study::{AlertEvent, BandCalculator, BandSeries, BandState, StudyConfig};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_mode() -> impl Strategy<Value = AverageMode> {
    prop_oneof![
        Just(AverageMode::Simple),
        Just(AverageMode::Exponential),
        Just(AverageMode::Weighted),
    ]
}

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, 0..max_len)
}

fn arb_multiplier() -> impl Strategy<Value = f64> {
    (0.0..10.0_f64).prop_map(|m| (m * 100.0).round() / 100.0)
}

fn calculator(length: usize, mode: AverageMode, multiplier: f64) -> BandCalculator {
    let config = StudyConfig::new(length, mode, multiplier, PriceSource::Close).unwrap();
    BandCalculator::new(config).unwrap()
}

fn tolerance(scale: f64) -> f64 {
    1e-9 * scale.abs().max(1.0)
}

// ── 1. Short series ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_is_all_undefined(
        length in 2usize..60,
        mode in arb_mode(),
        prices in arb_prices(60),
    ) {
        prop_assume!(prices.len() < length);
        let run = calculator(length, mode, 2.0).compute(&prices);
        prop_assert_eq!(run.series.len(), prices.len());
        prop_assert_eq!(run.series.defined_count(), 0);
        prop_assert!(run.series.signal.iter().all(|v| v.is_nan()));
        prop_assert!(run.series.upper.iter().all(|v| v.is_nan()));
        prop_assert!(run.series.lower.iter().all(|v| v.is_nan()));
        prop_assert!(run.alerts.is_empty());
    }
}

// ── 2 + 3. Symmetry and ordering ─────────────────────────────────────

proptest! {
    #[test]
    fn bands_symmetric_and_ordered(
        length in 1usize..30,
        mode in arb_mode(),
        multiplier in arb_multiplier(),
        prices in arb_prices(120),
    ) {
        let run = calculator(length, mode, multiplier).compute(&prices);
        for i in 0..prices.len() {
            let Some(p) = run.series.point(i) else {
                prop_assert!(i + 1 < length, "bar {} should be defined", i);
                continue;
            };
            let above = p.upper - p.main;
            let below = p.main - p.lower;
            prop_assert!((above - below).abs() <= tolerance(p.main), "bar {}: {} vs {}", i, above, below);
            prop_assert!(p.upper >= p.main && p.main >= p.lower, "bar {}: {:?}", i, p);
            prop_assert!(p.std_dev >= 0.0);
        }
    }
}

// ── 4. Zero multiplier ───────────────────────────────────────────────

proptest! {
    #[test]
    fn zero_multiplier_collapses_bands(
        length in 1usize..30,
        mode in arb_mode(),
        prices in arb_prices(100),
    ) {
        let run = calculator(length, mode, 0.0).compute(&prices);
        for i in 0..prices.len() {
            if let Some(p) = run.series.point(i) {
                prop_assert_eq!(p.upper, p.main);
                prop_assert_eq!(p.lower, p.main);
            }
        }
        // Price can never sit strictly outside a zero-width band on both
        // sides at once, so no bar raises two alerts.
        for pair in run.alerts.windows(2) {
            prop_assert!(pair[0].bar_index != pair[1].bar_index);
        }
    }
}

// ── 5. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn incremental_matches_full_pass(
        length in 1usize..25,
        mode in arb_mode(),
        multiplier in arb_multiplier(),
        prices in arb_prices(100),
    ) {
        let calc = calculator(length, mode, multiplier);
        let full = calc.compute(&prices);

        // Live feed: the price slice grows one bar at a time.
        let mut state = BandState::new();
        let mut series = BandSeries::new();
        let mut alerts: Vec<AlertEvent> = Vec::new();
        for i in 0..prices.len() {
            let update = calc.update(&prices[..=i], i, &mut state, &mut series);
            alerts.extend_from_slice(update.alerts());
        }

        prop_assert_eq!(&alerts, &full.alerts);
        prop_assert_eq!(series.len(), full.series.len());
        for i in 0..prices.len() {
            prop_assert_eq!(series.main_at(i), full.series.main_at(i));
            prop_assert_eq!(series.signal_at(i), full.series.signal_at(i));
            prop_assert_eq!(series.upper_at(i), full.series.upper_at(i));
            prop_assert_eq!(series.lower_at(i), full.series.lower_at(i));
        }
    }

    #[test]
    fn jump_to_last_bar_matches_full_pass(
        length in 1usize..25,
        mode in arb_mode(),
        prices in arb_prices(80),
    ) {
        // A host that only asks for the newest bar gets the gap filled first.
        prop_assume!(!prices.is_empty());
        let calc = calculator(length, mode, 2.0);
        let full = calc.compute(&prices);
        let last = prices.len() - 1;

        let mut state = BandState::new();
        let mut series = BandSeries::new();
        let update = calc.update(&prices, last, &mut state, &mut series);
        prop_assert_eq!(update.point().copied(), full.series.point(last));
        prop_assert_eq!(state.computed(), prices.len());
        for i in 0..prices.len() {
            prop_assert_eq!(series.point(i), full.series.point(i));
        }
    }
}
