use serde::{Deserialize, Serialize};

use super::{round_to, Channel, Series, SeriesError};

/// Per-window totals of the energy channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_consumption_history: f64,
    pub total_production_history: f64,
    pub total_consumption_forecast: f64,
    pub total_production_forecast: f64,
}

impl Summary {
    /// Sum consumption and production independently over both windows.
    ///
    /// Totals are taken over the emitted (already rounded) point values so
    /// that they add up with what the caller receives, then rounded to
    /// two decimals. Empty windows total zero. A total that overflows
    /// `f64` is an error, never an infinite or missing number.
    pub fn from_series(history: &Series, forecast: &Series) -> Result<Self, SeriesError> {
        Ok(Self {
            total_consumption_history: window_total(history, Channel::Consumption, "history")?,
            total_production_history: window_total(history, Channel::Production, "history")?,
            total_consumption_forecast: window_total(forecast, Channel::Consumption, "forecast")?,
            total_production_forecast: window_total(forecast, Channel::Production, "forecast")?,
        })
    }
}

fn window_total(
    series: &Series,
    channel: Channel,
    window: &'static str,
) -> Result<f64, SeriesError> {
    let total = round_to(series.total(channel), 2);
    if total.is_finite() {
        Ok(total)
    } else {
        Err(SeriesError::TotalOverflow { channel, window })
    }
}
