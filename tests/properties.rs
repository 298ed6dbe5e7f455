//! Property tests over the generator, backfill and forecaster.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use grid_forecast_service::domain::Summary;
use grid_forecast_service::forecast::{FormulaForecaster, FORECAST_HORIZON_HOURS};
use grid_forecast_service::simulation::{
    backfill_missing_channels, generate_history, SuppliedHistory, CONSUMPTION_FLOOR,
};

fn end(offset_minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(offset_minutes)
}

proptest! {
    #[test]
    fn history_is_hourly_and_bounded(
        length in 0usize..400,
        seed in any::<u64>(),
        offset in 0i64..(60 * 24 * 365),
    ) {
        let series = generate_history(length, end(offset), &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(series.len(), length);
        for pair in series.points().windows(2) {
            prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
        for point in &series {
            prop_assert!(point.consumption >= CONSUMPTION_FLOOR);
            prop_assert!(point.production >= 0.0);
        }
    }

    #[test]
    fn forecast_always_follows_anchor(
        history_len in 0usize..10_000,
        offset in 0i64..(60 * 24 * 365),
    ) {
        let anchor = end(offset);
        let a = FormulaForecaster.continue_from(anchor, history_len).unwrap();
        let b = FormulaForecaster.continue_from(anchor, history_len).unwrap();
        prop_assert_eq!(a.len(), FORECAST_HORIZON_HOURS);
        prop_assert_eq!(a.first_timestamp(), Some(anchor + Duration::hours(1)));
        prop_assert_eq!(a.last_timestamp(), Some(anchor + Duration::hours(24)));
        prop_assert_eq!(&a, &b);
    }

    #[test]
    fn backfill_preserves_supplied_channels(
        rows in prop::collection::vec((0.0f64..50.0, 0.0f64..20.0), 1..200),
        seed in any::<u64>(),
    ) {
        let input: Vec<Vec<f64>> = rows.iter().map(|&(c, p)| vec![c, p]).collect();
        let supplied = SuppliedHistory::from_rows(input).unwrap();
        let series = backfill_missing_channels(&supplied, end(0), &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(series.len(), rows.len());
        for (point, &(c, p)) in series.iter().zip(&rows) {
            prop_assert_eq!(point.consumption, c);
            prop_assert_eq!(point.production, p);
            prop_assert!(point.voltage.is_some());
            prop_assert!(point.frequency.is_some());
        }
    }

    #[test]
    fn summary_is_additive(length in 0usize..300, seed in any::<u64>()) {
        let history = generate_history(length, end(0), &mut StdRng::seed_from_u64(seed)).unwrap();
        let forecast = FormulaForecaster.continue_from(end(0), length).unwrap();
        let summary = Summary::from_series(&history, &forecast).unwrap();

        let consumption: f64 = history.iter().map(|p| p.consumption).sum();
        let production: f64 = history.iter().map(|p| p.production).sum();
        prop_assert!((summary.total_consumption_history - consumption).abs() < 0.005);
        prop_assert!((summary.total_production_history - production).abs() < 0.005);
    }
}

#[test]
fn one_day_scenario() {
    let history = generate_history(24, end(0), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(history.len(), 24);
    let span = history.last_timestamp().unwrap() - history.first_timestamp().unwrap();
    assert_eq!(span, Duration::hours(23));

    let anchor = history.last_timestamp().unwrap();
    let forecast = FormulaForecaster.continue_from(anchor, history.len()).unwrap();
    assert_eq!(forecast.first_timestamp(), Some(anchor + Duration::hours(1)));
    assert_eq!(forecast.points()[0].production, 0.0);
}
