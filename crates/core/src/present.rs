use crate::domain::scoring::{RiskLevel, UnknownRiskLevel};
use serde::Serialize;

pub const DECLINE_RECOMMENDATION: &str =
    "Consider declining or requesting additional collateral";
pub const ACCEPT_RECOMMENDATION: &str = "Loan appears acceptable";

/// Gauge reference line; the delta is reported against it.
pub const GAUGE_REFERENCE_PERCENT: f64 = 50.0;
const MODERATE_FROM_PERCENT: f64 = 30.0;
const HIGH_FROM_PERCENT: f64 = 70.0;

/// Styling bucket, taken from the service label and never from the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBucket {
    Elevated,
    Acceptable,
}

impl RiskBucket {
    pub fn label(self) -> &'static str {
        match self {
            RiskBucket::Elevated => "elevated",
            RiskBucket::Acceptable => "acceptable",
        }
    }
}

impl From<RiskLevel> for RiskBucket {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::High => RiskBucket::Elevated,
            RiskLevel::Low => RiskBucket::Acceptable,
        }
    }
}

/// Gauge color band: green below 30%, yellow below 70%, red above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    Low,
    Moderate,
    High,
}

impl GaugeBand {
    pub fn for_percent(percent: f64) -> Self {
        if percent >= HIGH_FROM_PERCENT {
            GaugeBand::High
        } else if percent >= MODERATE_FROM_PERCENT {
            GaugeBand::Moderate
        } else {
            GaugeBand::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            GaugeBand::Low => "green",
            GaugeBand::Moderate => "yellow",
            GaugeBand::High => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPresentation {
    pub percent: f64,
    pub risk_level: RiskLevel,
    pub bucket: RiskBucket,
    pub band: GaugeBand,
    pub recommendation: &'static str,
}

impl RiskPresentation {
    pub fn new(probability: f64, risk_level: RiskLevel) -> Self {
        let percent = if probability.is_finite() {
            (probability * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let bucket = RiskBucket::from(risk_level);
        let recommendation = match bucket {
            RiskBucket::Elevated => DECLINE_RECOMMENDATION,
            RiskBucket::Acceptable => ACCEPT_RECOMMENDATION,
        };

        Self {
            percent,
            risk_level,
            bucket,
            band: GaugeBand::for_percent(percent),
            recommendation,
        }
    }

    /// Same as [`RiskPresentation::new`] for a raw wire label.
    pub fn from_label(probability: f64, risk_level: &str) -> Result<Self, UnknownRiskLevel> {
        Ok(Self::new(probability, risk_level.parse()?))
    }

    pub fn delta_from_reference(&self) -> f64 {
        self.percent - GAUGE_REFERENCE_PERCENT
    }
}
