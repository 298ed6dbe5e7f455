use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::{FormulaForecaster, SeriesForecaster, FORECAST_HORIZON_HOURS};
use crate::domain::{hour_floor, Series, SeriesError, Summary};
use crate::simulation::{backfill_missing_channels, HistoryGenerator, SuppliedHistory};

/// Where the history window of a prediction comes from
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryInput {
    /// Synthesize a full history of the given length
    Synthesize { hours: usize },
    /// Use caller rows, backfilling channels they do not carry
    Supplied(SuppliedHistory),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("forecaster '{name}' failed: {cause}")]
    Forecaster {
        name: &'static str,
        cause: anyhow::Error,
    },

    #[error("forecaster '{name}' returned {got} points starting at {start:?}, expected {expected} starting at {expected_start}")]
    Horizon {
        name: &'static str,
        got: usize,
        expected: usize,
        start: Option<DateTime<Utc>>,
        expected_start: DateTime<Utc>,
    },
}

impl EngineError {
    /// True when the caller's data caused the failure
    pub fn is_input_error(&self) -> bool {
        matches!(self, EngineError::Series(e) if e.is_input_error())
    }
}

/// History, its 24-hour continuation and their totals
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub history: Series,
    pub forecast: Series,
    pub summary: Summary,
}

pub struct ForecastEngine {
    generator: HistoryGenerator,
    forecaster: Box<dyn SeriesForecaster>,
}

impl ForecastEngine {
    pub fn new(generator: HistoryGenerator, forecaster: Box<dyn SeriesForecaster>) -> Self {
        Self {
            generator,
            forecaster,
        }
    }

    /// Engine backed by the closed-form forecaster
    pub fn with_formula(generator: HistoryGenerator) -> Self {
        Self::new(generator, Box::new(FormulaForecaster))
    }

    pub fn forecaster_name(&self) -> &'static str {
        self.forecaster.name()
    }

    /// Build the history window ending at `now` (truncated to the hour)
    pub fn history(&self, input: &HistoryInput, now: DateTime<Utc>) -> Result<Series, SeriesError> {
        let mut rng = self.generator.rng();
        match input {
            HistoryInput::Synthesize { hours } => {
                crate::simulation::generate_history(*hours, now, &mut rng)
            }
            HistoryInput::Supplied(rows) => backfill_missing_channels(rows, now, &mut rng),
        }
    }

    /// Run one prediction.
    ///
    /// The forecast is anchored on the last history timestamp. An empty
    /// history anchors it on `now` truncated to the hour, which is where a
    /// non-empty history would have ended.
    pub async fn predict(
        &self,
        input: HistoryInput,
        now: DateTime<Utc>,
    ) -> Result<Prediction, EngineError> {
        let prediction = self.run(input, now).await?;
        let anchor = prediction
            .history
            .last_timestamp()
            .unwrap_or_else(|| hour_floor(now));
        info!(
            forecaster = self.forecaster.name(),
            history_points = prediction.history.len(),
            %anchor,
            total_consumption_forecast = prediction.summary.total_consumption_forecast,
            total_production_forecast = prediction.summary.total_production_forecast,
            "prediction generated"
        );
        Ok(prediction)
    }

    /// Same pipeline as [`predict`](Self::predict) on an empty history, for
    /// health checks. Logged at debug so it does not look like caller traffic.
    pub async fn dry_run(&self, now: DateTime<Utc>) -> Result<Prediction, EngineError> {
        let prediction = self.run(HistoryInput::Synthesize { hours: 0 }, now).await?;
        debug!(
            forecaster = self.forecaster.name(),
            forecast_points = prediction.forecast.len(),
            "dry run prediction"
        );
        Ok(prediction)
    }

    async fn run(
        &self,
        input: HistoryInput,
        now: DateTime<Utc>,
    ) -> Result<Prediction, EngineError> {
        let history = self.history(&input, now)?;
        let anchor = history
            .last_timestamp()
            .unwrap_or_else(|| hour_floor(now));

        let name = self.forecaster.name();
        let forecast = self
            .forecaster
            .forecast(anchor, history.len())
            .await
            .map_err(|cause| EngineError::Forecaster { name, cause })?;

        let expected_start = anchor + Duration::hours(1);
        if forecast.len() != FORECAST_HORIZON_HOURS
            || forecast.first_timestamp() != Some(expected_start)
        {
            return Err(EngineError::Horizon {
                name,
                got: forecast.len(),
                expected: FORECAST_HORIZON_HOURS,
                start: forecast.first_timestamp(),
                expected_start,
            });
        }

        let summary = Summary::from_series(&history, &forecast)?;

        if history.is_empty() {
            debug!(%anchor, "empty history, forecast anchored on current hour");
        }

        Ok(Prediction {
            history,
            forecast,
            summary,
        })
    }
}
