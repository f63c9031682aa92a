pub mod domain;
pub mod explain;
pub mod present;
pub mod scoring;
pub mod session;

pub mod config {
    use anyhow::{ensure, Context};
    use std::time::Duration;

    pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_url: String,
        pub timeout_secs: u64,
        pub health_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                api_url: DEFAULT_API_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                health_timeout_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = Self {
                api_url: std::env::var("CREDIT_RISK_API_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                timeout_secs: secs_from_env("CREDIT_RISK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
                health_timeout_secs: secs_from_env(
                    "CREDIT_RISK_HEALTH_TIMEOUT_SECS",
                    DEFAULT_HEALTH_TIMEOUT_SECS,
                ),
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            };
            settings.validate()?;
            Ok(settings)
        }

        pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
            self.api_url = api_url.into();
            self
        }

        pub fn validate(&self) -> anyhow::Result<()> {
            let url = reqwest::Url::parse(&self.api_url)
                .with_context(|| format!("CREDIT_RISK_API_URL is not a valid URL: {}", self.api_url))?;
            ensure!(
                matches!(url.scheme(), "http" | "https"),
                "CREDIT_RISK_API_URL must use http or https (got {})",
                url.scheme()
            );
            ensure!(self.timeout_secs > 0, "CREDIT_RISK_TIMEOUT_SECS must be positive");
            ensure!(
                self.health_timeout_secs > 0,
                "CREDIT_RISK_HEALTH_TIMEOUT_SECS must be positive"
            );
            Ok(())
        }

        pub fn timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_secs)
        }

        pub fn health_timeout(&self) -> Duration {
            Duration::from_secs(self.health_timeout_secs)
        }
    }

    fn secs_from_env(key: &str, default: u64) -> u64 {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, default, "ignoring unparseable timeout");
                default
            }),
            Err(_) => default,
        }
    }

}
