pub mod contract;
pub mod error;
pub mod http;

use crate::domain::application::LoanApplication;
use crate::domain::scoring::ScoringResult;

pub use error::PredictionError;
pub use http::HttpScoringClient;

/// The single boundary to the remote inference service.
#[async_trait::async_trait]
pub trait ScoringService: Send + Sync {
    fn base_url(&self) -> &str;

    /// One-shot `POST /predict`. No retries.
    async fn score(&self, application: &LoanApplication)
        -> Result<ScoringResult, PredictionError>;

    /// `GET /health`. Every failure degrades to `false`.
    async fn health_check(&self) -> bool;
}
