use crate::domain::scoring::{Attributions, RiskLevel, ScoringResult};
use crate::scoring::error::PredictionError;
use serde::Deserialize;

/// `POST /predict` 200 body as sent by the service. `risk_level` stays a
/// string here so an unknown label surfaces as its own error.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub default_probability: f64,
    pub risk_level: String,
    pub shap_values: Attributions,
}

impl PredictResponse {
    pub fn validate_and_into_result(self, body: &str) -> Result<ScoringResult, PredictionError> {
        if !(0.0..=1.0).contains(&self.default_probability) {
            return Err(PredictionError::Deserialization {
                detail: format!(
                    "default_probability must be between 0 and 1 (got {})",
                    self.default_probability
                ),
                body: body.to_string(),
            });
        }

        let risk_level = self.risk_level.parse::<RiskLevel>()?;

        Ok(ScoringResult {
            default_probability: self.default_probability,
            risk_level,
            shap_values: self.shap_values,
        })
    }
}

pub fn parse_response(body: &str) -> Result<ScoringResult, PredictionError> {
    let parsed = serde_json::from_str::<PredictResponse>(body).map_err(|err| {
        PredictionError::Deserialization {
            detail: err.to_string(),
            body: body.to_string(),
        }
    })?;
    parsed.validate_and_into_result(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::UnknownRiskLevel;
    use serde_json::json;

    #[test]
    fn parses_expected_shape() {
        let body = json!({
            "default_probability": 0.82,
            "risk_level": "HIGH",
            "shap_values": {"dti": 0.3, "fico_avg": -0.5},
            "model_version": "xgb-7"
        })
        .to_string();

        let result = parse_response(&body).unwrap();
        assert_eq!(result.default_probability, 0.82);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.shap_values.get("fico_avg"), Some(-0.5));
    }

    #[test]
    fn missing_field_is_a_deserialization_error() {
        let body = json!({"default_probability": 0.1, "risk_level": "LOW"}).to_string();
        let err = parse_response(&body).unwrap_err();
        match err {
            PredictionError::Deserialization { detail, body: raw } => {
                assert!(detail.contains("shap_values"), "{detail}");
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mistyped_field_is_a_deserialization_error() {
        let body = json!({
            "default_probability": "0.1",
            "risk_level": "LOW",
            "shap_values": {}
        })
        .to_string();
        assert_eq!(parse_response(&body).unwrap_err().kind(), "deserialization");
        assert_eq!(parse_response("<html>").unwrap_err().kind(), "deserialization");
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        let body = json!({
            "default_probability": 1.2,
            "risk_level": "HIGH",
            "shap_values": {}
        })
        .to_string();
        assert_eq!(parse_response(&body).unwrap_err().kind(), "deserialization");
    }

    #[test]
    fn unknown_risk_level_fails_loudly() {
        let body = json!({
            "default_probability": 0.5,
            "risk_level": "MEDIUM",
            "shap_values": {}
        })
        .to_string();
        assert_eq!(
            parse_response(&body).unwrap_err(),
            PredictionError::UnknownRiskLevel(UnknownRiskLevel {
                value: "MEDIUM".to_string()
            })
        );
    }
}
