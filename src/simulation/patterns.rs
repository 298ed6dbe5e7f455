//! Closed-form daily and weekly curves shared by the history generator and
//! the formula forecaster. `t` is an hour index; index 0 is midnight.

use std::f64::consts::PI;

pub const DAY_HOURS: f64 = 24.0;
pub const WEEK_HOURS: f64 = 24.0 * 7.0;

/// Mean outdoor temperature (°C)
pub const MEAN_TEMPERATURE_C: f64 = 20.0;
/// Half of the day/night temperature swing (°C)
pub const TEMPERATURE_AMPLITUDE_C: f64 = 5.0;
/// Extra load per degree away from the mean temperature
pub const TEMPERATURE_LOAD_PER_C: f64 = 0.5;

pub const BASE_LOAD: f64 = 10.0;
pub const DAILY_LOAD_AMPLITUDE: f64 = 5.0;
pub const WEEKLY_LOAD_AMPLITUDE: f64 = 0.5;
pub const WEEKLY_LOAD_WEIGHT: f64 = 2.0;

/// Output of the array at the top of a clear-sky day
pub const SOLAR_PEAK: f64 = 15.0;
/// Hours between midnight and sunrise on the modeled sine day
pub const SOLAR_PHASE_HOURS: f64 = 6.0;

pub const NOMINAL_VOLTAGE_V: f64 = 230.0;
/// Voltage sag per unit of consumption
pub const VOLTAGE_SAG_PER_LOAD: f64 = 0.1;
pub const NOMINAL_FREQUENCY_HZ: f64 = 50.0;

fn phase(t: f64, period: f64) -> f64 {
    2.0 * PI * t / period
}

/// Noise-free diurnal temperature, coldest at midnight, warmest at noon
pub fn diurnal_temperature(t: f64) -> f64 {
    -TEMPERATURE_AMPLITUDE_C * phase(t, DAY_HOURS).cos() + MEAN_TEMPERATURE_C
}

/// Heating/cooling load caused by deviating from the mean temperature
pub fn temperature_load(temperature_c: f64) -> f64 {
    TEMPERATURE_LOAD_PER_C * (temperature_c - MEAN_TEMPERATURE_C).abs()
}

/// Base load plus the 24-hour cycle
pub fn daily_load(t: f64) -> f64 {
    BASE_LOAD + DAILY_LOAD_AMPLITUDE * phase(t, DAY_HOURS).sin()
}

/// Week-long modulation of the load
pub fn weekly_load(t: f64) -> f64 {
    WEEKLY_LOAD_WEIGHT * (WEEKLY_LOAD_AMPLITUDE * phase(t, WEEK_HOURS).sin())
}

/// Ideal solar curve: zero overnight, half-sine between hour 6 and hour 18
pub fn clear_sky_production(t: f64) -> f64 {
    SOLAR_PEAK * phase(t - SOLAR_PHASE_HOURS, DAY_HOURS).sin().max(0.0)
}

/// Voltage after sagging under the given load
pub fn sagged_voltage(consumption: f64) -> f64 {
    NOMINAL_VOLTAGE_V - VOLTAGE_SAG_PER_LOAD * consumption
}
