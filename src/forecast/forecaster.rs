use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Series;

/// Number of hourly points every forecast carries
pub const FORECAST_HORIZON_HOURS: usize = 24;

/// Produces the hours that follow a history window.
///
/// `anchor` is the last history timestamp; the returned series must hold
/// exactly [`FORECAST_HORIZON_HOURS`] points starting one hour after it.
/// `history_len` places the forecast in the same phase space as the
/// history (the first forecast hour has index `history_len`).
///
/// [`super::FormulaForecaster`] is the default. A trained model plugs in
/// here by implementing this trait and handing it to
/// [`super::ForecastEngine::new`].
#[async_trait]
pub trait SeriesForecaster: Send + Sync {
    fn name(&self) -> &'static str;

    async fn forecast(&self, anchor: DateTime<Utc>, history_len: usize) -> Result<Series>;
}
