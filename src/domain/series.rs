use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SeriesError;

/// Number of channels a fully specified reading carries
pub const CHANNEL_COUNT: usize = 5;

/// One measured quantity of a reading, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Consumption,
    Production,
    Temperature,
    Voltage,
    Frequency,
}

impl Channel {
    /// All channels in the order callers send them
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Consumption,
        Channel::Production,
        Channel::Temperature,
        Channel::Voltage,
        Channel::Frequency,
    ];

    /// Decimal places used when emitting this channel
    pub fn decimals(&self) -> i32 {
        match self {
            Channel::Consumption | Channel::Production => 2,
            Channel::Temperature | Channel::Voltage => 1,
            Channel::Frequency => 3,
        }
    }

    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.decimals())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Channel::Consumption => "consumption",
            Channel::Production => "production",
            Channel::Temperature => "temperature",
            Channel::Voltage => "voltage",
            Channel::Frequency => "frequency",
        };
        write!(f, "{}", s)
    }
}

/// Whether a point was observed/synthesized or predicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    History,
    Forecast,
}

/// One hourly reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: DateTime<Utc>,
    /// Household load (kWh per hour)
    pub consumption: f64,
    /// Solar production (kWh per hour)
    pub production: f64,
    /// Outdoor temperature (°C)
    pub temperature: f64,
    /// Grid voltage (V), not modeled for forecast points
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub voltage: Option<f64>,
    /// Grid frequency (Hz), not modeled for forecast points
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frequency: Option<f64>,
    #[serde(rename = "type")]
    pub kind: PointKind,
}

impl TimePoint {
    /// Value of a channel, `None` when the point does not carry it
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Consumption => Some(self.consumption),
            Channel::Production => Some(self.production),
            Channel::Temperature => Some(self.temperature),
            Channel::Voltage => self.voltage,
            Channel::Frequency => self.frequency,
        }
    }

    pub fn set_channel(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::Consumption => self.consumption = value,
            Channel::Production => self.production = value,
            Channel::Temperature => self.temperature = value,
            Channel::Voltage => self.voltage = Some(value),
            Channel::Frequency => self.frequency = Some(value),
        }
    }
}

/// Hourly series: strictly increasing timestamps spaced exactly one hour apart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    points: Vec<TimePoint>,
}

impl Series {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series, rejecting gaps, duplicates and out-of-order points
    pub fn from_points(points: Vec<TimePoint>) -> Result<Self, SeriesError> {
        let step = Duration::hours(1);
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].timestamp - pair[0].timestamp != step {
                return Err(SeriesError::NonContiguous { index: index + 1 });
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimePoint> {
        self.points.iter()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// Sum of one channel over all points, missing values count as zero
    pub fn total(&self, channel: Channel) -> f64 {
        self.points.iter().filter_map(|p| p.channel(channel)).sum()
    }

    pub fn into_points(self) -> Vec<TimePoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a TimePoint;
    type IntoIter = std::slice::Iter<'a, TimePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Round half away from zero to a number of decimal places.
///
/// Values too large to scale are already coarser than the requested
/// precision and come back unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Truncate an instant to the start of its hour
pub fn hour_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(Duration::hours(1)).unwrap_or(ts)
}

/// `count` consecutive hourly timestamps whose last element is `end`
pub fn hourly_timestamps_ending_at(end: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    (0..count)
        .map(|i| end - Duration::hours((count - 1 - i) as i64))
        .collect()
}
