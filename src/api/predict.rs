use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::error::ApiError,
    config::MAX_HISTORY_HOURS,
    forecast::{HistoryInput, Prediction},
    service::AppState,
    simulation::SuppliedHistory,
};

// validator compares lengths as u64 and ranges in the field's own type
const MAX_HISTORY_ROWS: u64 = MAX_HISTORY_HOURS as u64;
const MAX_HISTORY_HOURS_F64: f64 = MAX_HISTORY_HOURS as f64;

/// Body of `POST /predict/consumption`. Both fields are optional; an empty
/// body behaves like `{}`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PredictionRequest {
    /// Hourly rows `[consumption, production, temperature, voltage, frequency]`,
    /// trailing channels may be left out. Absent means synthesize.
    #[validate(length(max = MAX_HISTORY_ROWS))]
    pub historical_data: Option<Vec<Vec<f64>>>,

    /// Length of the synthesized history; fractions are truncated
    #[validate(range(min = 0.0, max = MAX_HISTORY_HOURS_F64))]
    pub history_hours: Option<f64>,
}

impl PredictionRequest {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
    }

    /// Resolve which history the engine should build
    pub fn into_history_input(self, default_hours: usize) -> Result<HistoryInput, ApiError> {
        match self.historical_data {
            Some(rows) => {
                if self.history_hours.is_some() {
                    debug!("history_hours ignored, caller supplied historical_data");
                }
                Ok(HistoryInput::Supplied(SuppliedHistory::from_rows(rows)?))
            }
            None => {
                let hours = self
                    .history_hours
                    .map(|h| h.trunc() as usize)
                    .unwrap_or(default_hours);
                Ok(HistoryInput::Synthesize { hours })
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<serde_json::Value>,
}

/// GET / - Service greeting
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "Hello": "AI Service Ready" }))
}

/// POST /predict/consumption - History plus 24h forecast and totals
#[tracing::instrument(skip_all, fields(run_id = %Uuid::new_v4()))]
pub async fn predict_consumption(
    State(st): State<AppState>,
    body: Bytes,
) -> Result<Json<Prediction>, ApiError> {
    let request = PredictionRequest::parse(&body)?;
    request.validate()?;

    let input = request.into_history_input(st.cfg.generator.default_history_hours)?;
    let prediction = st.engine.predict(input, Utc::now()).await?;
    Ok(Json(prediction))
}

/// POST /match/producers - Producer/consumer matching placeholder
pub async fn match_producers() -> Json<MatchResponse> {
    Json(MatchResponse { matches: vec![] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_default_request() {
        let request = PredictionRequest::parse(b"").unwrap();
        assert!(request.historical_data.is_none());
        assert!(request.history_hours.is_none());
        assert!(PredictionRequest::parse(b"  \n").is_ok());
    }

    #[test]
    fn test_invalid_json_is_bad_request() {
        let err = PredictionRequest::parse(b"{\"historical_data\": [1, 2").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_fractional_hours_truncate() {
        let request = PredictionRequest {
            history_hours: Some(47.9),
            ..Default::default()
        };
        assert_eq!(
            request.into_history_input(720).unwrap(),
            HistoryInput::Synthesize { hours: 47 }
        );
    }

    #[test]
    fn test_default_hours_when_nothing_supplied() {
        assert_eq!(
            PredictionRequest::default().into_history_input(720).unwrap(),
            HistoryInput::Synthesize { hours: 720 }
        );
    }

    #[test]
    fn test_supplied_rows_take_precedence() {
        let request = PredictionRequest {
            historical_data: Some(vec![vec![3.0, 0.5]; 4]),
            history_hours: Some(100.0),
        };
        match request.into_history_input(720).unwrap() {
            HistoryInput::Supplied(rows) => {
                assert_eq!(rows.len(), 4);
                assert_eq!(rows.width(), 2);
            }
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn test_validation_limits() {
        assert_eq!(MAX_HISTORY_HOURS, 8760);

        let too_long = PredictionRequest {
            history_hours: Some(8761.0),
            ..Default::default()
        };
        assert!(too_long.validate().is_err());

        let negative = PredictionRequest {
            history_hours: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let too_many_rows = PredictionRequest {
            historical_data: Some(vec![vec![1.0]; 8761]),
            ..Default::default()
        };
        assert!(too_many_rows.validate().is_err());
    }

    #[test]
    fn test_limits_accept_one_full_year() {
        let longest = PredictionRequest {
            history_hours: Some(MAX_HISTORY_HOURS as f64),
            ..Default::default()
        };
        assert!(longest.validate().is_ok());

        let full_year_of_rows = PredictionRequest {
            historical_data: Some(vec![vec![1.0]; MAX_HISTORY_HOURS]),
            ..Default::default()
        };
        assert!(full_year_of_rows.validate().is_ok());
    }
}
