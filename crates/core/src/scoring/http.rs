use crate::config::Settings;
use crate::domain::application::LoanApplication;
use crate::domain::scoring::ScoringResult;
use crate::scoring::contract;
use crate::scoring::error::PredictionError;
use crate::scoring::ScoringService;
use anyhow::Context;
use std::time::{Duration, Instant};

const PREDICT_PATH: &str = "/predict";
const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpScoringClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("failed to build scoring http client")?;

        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            health_timeout: settings.health_timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn connectivity(&self, err: &reqwest::Error) -> PredictionError {
        PredictionError::Connectivity {
            base_url: self.base_url.clone(),
            timed_out: err.is_timeout(),
            detail: err.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ScoringService for HttpScoringClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn score(
        &self,
        application: &LoanApplication,
    ) -> Result<ScoringResult, PredictionError> {
        application.validate()?;

        let started = Instant::now();
        let res = self
            .http
            .post(self.url(PREDICT_PATH))
            .json(application)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(base_url = %self.base_url, error = %err, "scoring request failed");
                self.connectivity(&err)
            })?;

        let status = res.status();
        if !status.is_success() {
            // The status alone decides the error kind; an unreadable body is reported empty.
            let body = res.text().await.unwrap_or_else(|err| {
                tracing::warn!(%status, error = %err, "failed to read scoring error body");
                String::new()
            });
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::warn!(status = status.as_u16(), elapsed_ms, "scoring service returned an error status");
            return Err(PredictionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await.map_err(|err| {
            tracing::warn!(base_url = %self.base_url, %status, error = %err, "failed to read scoring response body");
            self.connectivity(&err)
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(status = status.as_u16(), elapsed_ms, "scoring response received");
        contract::parse_response(&body)
    }

    async fn health_check(&self) -> bool {
        let res = self
            .http
            .get(self.url(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await;

        match res {
            Ok(res) if res.status() == reqwest::StatusCode::OK => true,
            Ok(res) => {
                tracing::warn!(status = res.status().as_u16(), "unexpected health check response");
                false
            }
            Err(err) => {
                tracing::warn!(base_url = %self.base_url, error = %err, "health check failed");
                false
            }
        }
    }
}
