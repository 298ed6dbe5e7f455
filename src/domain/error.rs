use thiserror::Error;

use super::Channel;

/// Errors raised while building or validating hourly series
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("row {row} has {got} values, expected {expected} like the first row")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("rows must carry between 1 and 5 channels, got {width}")]
    InvalidWidth { width: usize },

    #[error("row {row}: invalid {channel} value {value}")]
    InvalidValue {
        row: usize,
        channel: Channel,
        value: f64,
    },

    #[error("point {index} is not exactly one hour after its predecessor")]
    NonContiguous { index: usize },

    #[error("{channel} total over the {window} window is too large to represent")]
    TotalOverflow {
        channel: Channel,
        window: &'static str,
    },

    #[error("noise distribution: {0}")]
    Distribution(String),
}

impl SeriesError {
    /// True for errors caused by caller-supplied data rather than by the service
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SeriesError::RaggedRows { .. }
                | SeriesError::InvalidWidth { .. }
                | SeriesError::InvalidValue { .. }
                | SeriesError::TotalOverflow { .. }
        )
    }
}

impl From<rand_distr::NormalError> for SeriesError {
    fn from(error: rand_distr::NormalError) -> Self {
        SeriesError::Distribution(error.to_string())
    }
}

impl From<rand_distr::BetaError> for SeriesError {
    fn from(error: rand_distr::BetaError) -> Self {
        SeriesError::Distribution(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_flagged() {
        assert!(SeriesError::InvalidWidth { width: 7 }.is_input_error());
        assert!(SeriesError::RaggedRows { row: 3, expected: 2, got: 5 }.is_input_error());
        assert!(SeriesError::TotalOverflow {
            channel: Channel::Consumption,
            window: "history"
        }
        .is_input_error());
        assert!(!SeriesError::NonContiguous { index: 1 }.is_input_error());
        assert!(!SeriesError::Distribution("bad".into()).is_input_error());
    }

    #[test]
    fn test_error_display() {
        let error = SeriesError::InvalidValue {
            row: 4,
            channel: Channel::Production,
            value: -1.5,
        };
        assert_eq!(error.to_string(), "row 4: invalid production value -1.5");
    }
}
