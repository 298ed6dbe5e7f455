//! Closed-form 24-hour continuation of the synthetic history patterns.
//!
//! The forecast is a clear prediction: no noise, no weekly load term, and
//! a fixed sunny-day factor in place of the random weather factor. This
//! differs from the history formulas on purpose.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{SeriesForecaster, FORECAST_HORIZON_HOURS};
use crate::domain::{Channel, PointKind, Series, SeriesError, TimePoint};
use crate::simulation::patterns::{
    clear_sky_production, daily_load, diurnal_temperature, temperature_load,
};

/// Weather factor assumed for every forecast hour
pub const SUNNY_DAY_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaForecaster;

impl FormulaForecaster {
    /// Deterministic point for continuation index `t_f`
    pub fn point_at(&self, t_f: usize, timestamp: DateTime<Utc>) -> TimePoint {
        let t = t_f as f64;
        let temperature = diurnal_temperature(t);
        let consumption = daily_load(t) + temperature_load(temperature);
        let production = clear_sky_production(t) * SUNNY_DAY_FACTOR;

        TimePoint {
            timestamp,
            consumption: Channel::Consumption.round(consumption),
            production: Channel::Production.round(production),
            temperature: Channel::Temperature.round(temperature),
            voltage: None,
            frequency: None,
            kind: PointKind::Forecast,
        }
    }

    /// The 24 hours after `anchor`, indices `history_len..history_len + 24`
    pub fn continue_from(
        &self,
        anchor: DateTime<Utc>,
        history_len: usize,
    ) -> Result<Series, SeriesError> {
        let points = (0..FORECAST_HORIZON_HOURS)
            .map(|i| {
                let timestamp = anchor + Duration::hours(i as i64 + 1);
                self.point_at(history_len + i, timestamp)
            })
            .collect();
        Series::from_points(points)
    }
}

#[async_trait]
impl SeriesForecaster for FormulaForecaster {
    fn name(&self) -> &'static str {
        "formula"
    }

    async fn forecast(&self, anchor: DateTime<Utc>, history_len: usize) -> Result<Series> {
        Ok(self.continue_from(anchor, history_len)?)
    }
}
