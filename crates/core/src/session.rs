use crate::domain::application::{LoanApplication, LoanApplicationInput};
use crate::domain::scoring::ScoringResult;
use crate::explain::Explanation;
use crate::present::RiskPresentation;
use crate::scoring::{PredictionError, ScoringService};
use serde::Serialize;
use uuid::Uuid;

/// `Idle -> Submitting -> {Succeeded, Failed}`; a new submission starts the
/// next cycle from either terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything rendered for one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub cycle_id: Uuid,
    pub application: LoanApplication,
    pub result: ScoringResult,
    pub risk: RiskPresentation,
    pub explanation: Explanation,
}

impl Assessment {
    pub fn new(cycle_id: Uuid, application: LoanApplication, result: ScoringResult) -> Self {
        let risk = RiskPresentation::new(result.default_probability, result.risk_level);
        let explanation = Explanation::from_attributions(&result.shap_values);
        Self {
            cycle_id,
            application,
            result,
            risk,
            explanation,
        }
    }
}

/// Explicit state for the prediction flow. Only `submit` and `reset` change it.
pub struct PredictionSession<S> {
    service: S,
    state: CycleState,
    application: Option<LoanApplication>,
    outcome: Option<Result<Assessment, PredictionError>>,
}

impl<S: ScoringService> PredictionSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: CycleState::Idle,
            application: None,
            outcome: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// The application built by the latest submission, if it validated.
    pub fn application(&self) -> Option<&LoanApplication> {
        self.application.as_ref()
    }

    pub fn last_assessment(&self) -> Option<&Assessment> {
        self.outcome.as_ref().and_then(|o| o.as_ref().ok())
    }

    pub fn last_error(&self) -> Option<&PredictionError> {
        self.outcome.as_ref().and_then(|o| o.as_ref().err())
    }

    /// Connectivity indicator; never fails.
    pub async fn check_health(&self) -> bool {
        self.service.health_check().await
    }

    /// Runs one build -> score -> render cycle to completion.
    ///
    /// A cycle whose future was dropped mid-flight leaves the session in
    /// `Submitting`; further submissions return `Busy` until [`reset`].
    ///
    /// [`reset`]: PredictionSession::reset
    pub async fn submit(
        &mut self,
        input: &LoanApplicationInput,
    ) -> Result<Assessment, PredictionError> {
        if self.state == CycleState::Submitting {
            return Err(PredictionError::Busy);
        }

        let cycle_id = Uuid::new_v4();
        self.state = CycleState::Submitting;
        self.outcome = None;
        tracing::info!(%cycle_id, "prediction cycle started");

        let outcome = self.run(cycle_id, input).await;
        match &outcome {
            Ok(assessment) => {
                tracing::info!(
                    %cycle_id,
                    probability = assessment.result.default_probability,
                    risk_level = %assessment.result.risk_level,
                    features = assessment.result.shap_values.len(),
                    "prediction cycle succeeded"
                );
                self.state = CycleState::Succeeded;
            }
            Err(err) => {
                tracing::warn!(%cycle_id, kind = err.kind(), error = %err, "prediction cycle failed");
                self.state = CycleState::Failed;
            }
        }

        self.outcome = Some(outcome.clone());
        outcome
    }

    async fn run(
        &mut self,
        cycle_id: Uuid,
        input: &LoanApplicationInput,
    ) -> Result<Assessment, PredictionError> {
        self.application = None;
        let application = input.build()?;
        self.application = Some(application.clone());

        let result = self.service.score(&application).await?;
        Ok(Assessment::new(cycle_id, application, result))
    }

    pub fn reset(&mut self) {
        self.state = CycleState::Idle;
        self.outcome = None;
    }
}
