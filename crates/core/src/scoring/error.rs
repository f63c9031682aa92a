use crate::domain::application::ValidationError;
use crate::domain::scoring::UnknownRiskLevel;
use std::fmt;

/// Everything that can end a prediction cycle without a result.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// The application broke an invariant; nothing was sent.
    Validation(ValidationError),
    /// The service could not be reached, or did not answer in time.
    Connectivity {
        base_url: String,
        timed_out: bool,
        detail: String,
    },
    /// The service answered with a non-2xx status.
    Service { status: u16, body: String },
    /// A 2xx body that does not match the response contract.
    Deserialization { detail: String, body: String },
    UnknownRiskLevel(UnknownRiskLevel),
    /// A submission is already in flight.
    Busy,
}

impl PredictionError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::Validation(_) => "validation",
            PredictionError::Connectivity { .. } => "connectivity",
            PredictionError::Service { .. } => "service",
            PredictionError::Deserialization { .. } => "deserialization",
            PredictionError::UnknownRiskLevel(_) => "unknown_risk_level",
            PredictionError::Busy => "busy",
        }
    }

    /// Message shown to the person filling in the form.
    pub fn user_message(&self) -> String {
        match self {
            PredictionError::Validation(err) => format!("Invalid application: {err}"),
            PredictionError::Connectivity { base_url, .. } => format!(
                "Cannot connect to prediction API. Make sure the scoring service is running on {base_url}"
            ),
            PredictionError::Service { status, body } => format!("API Error: {status} - {body}"),
            PredictionError::Deserialization { .. } | PredictionError::UnknownRiskLevel(_) => {
                format!("Prediction failed: {self}")
            }
            PredictionError::Busy => {
                "A prediction is already running; wait for it to finish".to_string()
            }
        }
    }
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionError::Validation(err) => write!(f, "invalid loan application: {err}"),
            PredictionError::Connectivity {
                base_url,
                timed_out: true,
                ..
            } => write!(f, "scoring service at {base_url} timed out"),
            PredictionError::Connectivity {
                base_url, detail, ..
            } => write!(f, "scoring service at {base_url} is unreachable: {detail}"),
            PredictionError::Service { status, body } => {
                write!(f, "scoring service returned HTTP {status}: {body}")
            }
            PredictionError::Deserialization { detail, .. } => {
                write!(f, "unexpected scoring response: {detail}")
            }
            PredictionError::UnknownRiskLevel(err) => write!(f, "{err}"),
            PredictionError::Busy => f.write_str("a prediction is already in flight"),
        }
    }
}

impl std::error::Error for PredictionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictionError::Validation(err) => Some(err),
            PredictionError::UnknownRiskLevel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for PredictionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<UnknownRiskLevel> for PredictionError {
    fn from(value: UnknownRiskLevel) -> Self {
        Self::UnknownRiskLevel(value)
    }
}
