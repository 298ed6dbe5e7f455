//! Caller-supplied history: validation of the raw rows and backfilling of
//! channels the caller left out.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::history::generate_history;
use crate::domain::{
    hour_floor, hourly_timestamps_ending_at, Channel, PointKind, Series, SeriesError, TimePoint,
    CHANNEL_COUNT,
};

static WIRE_ORDER: [Channel; CHANNEL_COUNT] = Channel::ALL;

/// Rectangular matrix of readings, one row per hour, channels in
/// [`Channel::ALL`] order. The first row fixes the width.
#[derive(Debug, Clone, PartialEq)]
pub struct SuppliedHistory {
    width: usize,
    rows: Vec<Vec<f64>>,
}

impl SuppliedHistory {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SeriesError> {
        if rows.is_empty() {
            return Ok(Self { width: 0, rows });
        }
        let width = rows[0].len();
        if width == 0 || width > CHANNEL_COUNT {
            return Err(SeriesError::InvalidWidth { width });
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SeriesError::RaggedRows {
                    row: row_index,
                    expected: width,
                    got: row.len(),
                });
            }
            for (channel, &value) in WIRE_ORDER.iter().zip(row) {
                let energy = matches!(channel, Channel::Consumption | Channel::Production);
                if !value.is_finite() || (energy && value < 0.0) {
                    return Err(SeriesError::InvalidValue {
                        row: row_index,
                        channel: *channel,
                        value,
                    });
                }
            }
        }

        Ok(Self { width, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Channels per row, 0 for an empty history
    pub fn width(&self) -> usize {
        self.width
    }

    /// Channels every row carries
    pub fn supplied_channels(&self) -> &'static [Channel] {
        &WIRE_ORDER[..self.width]
    }

    /// Channels that have to be synthesized
    pub fn missing_channels(&self) -> &'static [Channel] {
        &WIRE_ORDER[self.width..]
    }

    pub fn is_complete(&self) -> bool {
        self.width == CHANNEL_COUNT
    }
}

/// Turn supplied rows into an hourly series ending at `end` (truncated to
/// the hour).
///
/// Channels the caller did not send are copied from a freshly synthesized
/// series of the same length, aligned on the tail. Supplied values are kept
/// as sent. Complete rows are used without synthesizing anything.
pub fn backfill_missing_channels<R: Rng + ?Sized>(
    supplied: &SuppliedHistory,
    end: DateTime<Utc>,
    rng: &mut R,
) -> Result<Series, SeriesError> {
    if supplied.is_empty() {
        return Ok(Series::empty());
    }

    let end = hour_floor(end);
    let template: Vec<TimePoint> = if supplied.is_complete() {
        hourly_timestamps_ending_at(end, supplied.len())
            .into_iter()
            .map(|timestamp| TimePoint {
                timestamp,
                consumption: 0.0,
                production: 0.0,
                temperature: 0.0,
                voltage: None,
                frequency: None,
                kind: PointKind::History,
            })
            .collect()
    } else {
        let synthesized = generate_history(supplied.len(), end, rng)?.into_points();
        let tail = synthesized.len() - supplied.len();
        synthesized.into_iter().skip(tail).collect()
    };

    let points = template
        .into_iter()
        .zip(&supplied.rows)
        .map(|(mut point, row)| {
            for (channel, &value) in supplied.supplied_channels().iter().zip(row) {
                point.set_channel(*channel, value);
            }
            point
        })
        .collect();

    Series::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    fn rows(n: usize, width: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..width).map(|c| (i * 10 + c) as f64 + 0.123).collect())
            .collect()
    }

    #[test]
    fn test_empty_rows_are_valid() {
        let supplied = SuppliedHistory::from_rows(vec![]).unwrap();
        assert!(supplied.is_empty());
        let series = backfill_missing_channels(&supplied, end(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = SuppliedHistory::from_rows(vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![1.0, 2.0],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SeriesError::RaggedRows {
                row: 1,
                expected: 5,
                got: 2
            }
        );
    }

    #[test]
    fn test_width_bounds() {
        assert_eq!(
            SuppliedHistory::from_rows(vec![vec![]]).unwrap_err(),
            SeriesError::InvalidWidth { width: 0 }
        );
        assert_eq!(
            SuppliedHistory::from_rows(vec![vec![1.0; 6]]).unwrap_err(),
            SeriesError::InvalidWidth { width: 6 }
        );
    }

    #[test]
    fn test_negative_energy_rejected() {
        let err = SuppliedHistory::from_rows(vec![vec![3.0, 1.0], vec![3.0, -0.5]]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::InvalidValue {
                row: 1,
                channel: Channel::Production,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_temperature_allowed() {
        assert!(SuppliedHistory::from_rows(vec![vec![3.0, 1.0, -12.5]]).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = SuppliedHistory::from_rows(vec![vec![f64::NAN, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::InvalidValue {
                row: 0,
                channel: Channel::Consumption,
                ..
            }
        ));
    }

    #[test]
    fn test_two_channel_backfill_keeps_supplied_values() {
        let input = rows(48, 2);
        let supplied = SuppliedHistory::from_rows(input.clone()).unwrap();
        assert_eq!(
            supplied.missing_channels(),
            &[Channel::Temperature, Channel::Voltage, Channel::Frequency]
        );

        let series = backfill_missing_channels(&supplied, end(), &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(series.len(), 48);
        for (point, row) in series.iter().zip(&input) {
            assert_eq!(point.consumption, row[0]);
            assert_eq!(point.production, row[1]);
            assert!(point.voltage.is_some());
            assert!(point.frequency.is_some());
            assert_eq!(point.kind, PointKind::History);
        }
    }

    #[test]
    fn test_backfill_matches_synthesized_tail() {
        let supplied = SuppliedHistory::from_rows(rows(24, 3)).unwrap();
        let series = backfill_missing_channels(&supplied, end(), &mut StdRng::seed_from_u64(9))
            .unwrap();
        let reference = generate_history(24, end(), &mut StdRng::seed_from_u64(9)).unwrap();

        for (point, synthetic) in series.iter().zip(&reference) {
            assert_eq!(point.timestamp, synthetic.timestamp);
            assert_eq!(point.voltage, synthetic.voltage);
            assert_eq!(point.frequency, synthetic.frequency);
            assert_ne!(point.temperature, synthetic.temperature);
        }
    }

    #[test]
    fn test_single_channel_backfills_production() {
        let supplied = SuppliedHistory::from_rows(vec![vec![4.0]; 24]).unwrap();
        let series = backfill_missing_channels(&supplied, end(), &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert!(series.iter().all(|p| p.consumption == 4.0));
        assert!(series.iter().all(|p| p.production >= 0.0));
        assert!(series.iter().any(|p| p.production > 0.0));
    }

    #[test]
    fn test_complete_rows_used_verbatim() {
        let input = vec![vec![5.5, 1.25, 18.0, 229.4, 49.98]; 3];
        let supplied = SuppliedHistory::from_rows(input).unwrap();
        assert!(supplied.missing_channels().is_empty());

        let series = backfill_missing_channels(&supplied, end(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        let last = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(series.last_timestamp(), Some(last));
        assert_eq!(series.first_timestamp(), Some(last - Duration::hours(2)));
        for point in &series {
            assert_eq!(point.temperature, 18.0);
            assert_eq!(point.voltage, Some(229.4));
            assert_eq!(point.frequency, Some(49.98));
        }
    }
}
