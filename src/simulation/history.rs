//! # Synthetic History Generation
//!
//! Produces an hourly multivariate series (consumption, production,
//! temperature, voltage, frequency) that follows daily and weekly patterns
//! with Gaussian noise and a Beta-distributed cloud-cover factor on the
//! solar curve.
//!
//! The shape is fixed; the noise is not reproducible unless a seed is set
//! in [`HistoryGeneratorConfig`] or a seeded RNG is passed to
//! [`generate_history`].

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Beta, Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::patterns::{
    clear_sky_production, daily_load, diurnal_temperature, sagged_voltage, temperature_load,
    weekly_load, NOMINAL_FREQUENCY_HZ,
};
use crate::domain::{
    hour_floor, hourly_timestamps_ending_at, Channel, PointKind, Series, SeriesError, TimePoint,
};

/// Consumption never drops below this value
pub const CONSUMPTION_FLOOR: f64 = 2.0;

/// Lower bound of the rescaled weather factor (heavy overcast)
pub const WEATHER_FACTOR_MIN: f64 = 0.2;
/// Upper bound of the rescaled weather factor (clear sky)
pub const WEATHER_FACTOR_MAX: f64 = 1.0;

const TEMPERATURE_NOISE_C: f64 = 2.0;
const CONSUMPTION_NOISE: f64 = 1.0;
const VOLTAGE_NOISE_V: f64 = 0.5;
const FREQUENCY_NOISE_HZ: f64 = 0.02;
const WEATHER_BETA_ALPHA: f64 = 2.0;
const WEATHER_BETA_BETA: f64 = 5.0;

/// History generator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryGeneratorConfig {
    /// Random seed for reproducibility (None = fresh entropy per call)
    pub random_seed: Option<u64>,
}

/// Noise sources of the generator.
///
/// Cloud cover is Beta(2, 5): mostly overcast-ish, occasionally bright.
struct NoiseModel {
    temperature: Normal<f64>,
    consumption: Normal<f64>,
    voltage: Normal<f64>,
    frequency: Normal<f64>,
    weather: Beta<f64>,
}

impl NoiseModel {
    fn new() -> Result<Self, SeriesError> {
        Ok(Self {
            temperature: Normal::new(0.0, TEMPERATURE_NOISE_C)?,
            consumption: Normal::new(0.0, CONSUMPTION_NOISE)?,
            voltage: Normal::new(0.0, VOLTAGE_NOISE_V)?,
            frequency: Normal::new(0.0, FREQUENCY_NOISE_HZ)?,
            weather: Beta::new(WEATHER_BETA_ALPHA, WEATHER_BETA_BETA)?,
        })
    }

    /// Beta sample rescaled from [0, 1] to [WEATHER_FACTOR_MIN, WEATHER_FACTOR_MAX]
    fn weather_factor<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.weather.sample(rng) * (WEATHER_FACTOR_MAX - WEATHER_FACTOR_MIN) + WEATHER_FACTOR_MIN
    }
}

/// Unrounded channel values for one hour
#[derive(Debug, Clone, Copy)]
struct RawReading {
    consumption: f64,
    production: f64,
    temperature: f64,
    voltage: f64,
    frequency: f64,
}

impl RawReading {
    fn sample<R: Rng + ?Sized>(t: f64, noise: &NoiseModel, rng: &mut R) -> Self {
        let temperature = diurnal_temperature(t) + noise.temperature.sample(rng);

        let consumption = (daily_load(t)
            + weekly_load(t)
            + temperature_load(temperature)
            + noise.consumption.sample(rng))
        .max(CONSUMPTION_FLOOR);

        let production = clear_sky_production(t) * noise.weather_factor(rng);
        let voltage = sagged_voltage(consumption) + noise.voltage.sample(rng);
        let frequency = NOMINAL_FREQUENCY_HZ + noise.frequency.sample(rng);

        Self {
            consumption,
            production,
            temperature,
            voltage,
            frequency,
        }
    }

    fn into_point(self, timestamp: DateTime<Utc>) -> TimePoint {
        TimePoint {
            timestamp,
            consumption: Channel::Consumption.round(self.consumption),
            production: Channel::Production.round(self.production),
            temperature: Channel::Temperature.round(self.temperature),
            voltage: Some(Channel::Voltage.round(self.voltage)),
            frequency: Some(Channel::Frequency.round(self.frequency)),
            kind: PointKind::History,
        }
    }
}

/// Synthesize `length_hours` hourly points whose last timestamp is `end`
/// truncated to the hour. Hour index 0 is the first point.
pub fn generate_history<R: Rng + ?Sized>(
    length_hours: usize,
    end: DateTime<Utc>,
    rng: &mut R,
) -> Result<Series, SeriesError> {
    if length_hours == 0 {
        return Ok(Series::empty());
    }

    let noise = NoiseModel::new()?;
    let points = hourly_timestamps_ending_at(hour_floor(end), length_hours)
        .into_iter()
        .enumerate()
        .map(|(t, timestamp)| RawReading::sample(t as f64, &noise, &mut *rng).into_point(timestamp))
        .collect();

    Series::from_points(points)
}

/// Owns the seeding policy for synthesized histories
#[derive(Debug, Clone, Default)]
pub struct HistoryGenerator {
    config: HistoryGeneratorConfig,
}

impl HistoryGenerator {
    pub fn new(config: HistoryGeneratorConfig) -> Self {
        Self { config }
    }

    /// A fresh RNG for one request
    pub fn rng(&self) -> StdRng {
        match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn generate(&self, length_hours: usize, end: DateTime<Utc>) -> Result<Series, SeriesError> {
        generate_history(length_hours, end, &mut self.rng())
    }
}
