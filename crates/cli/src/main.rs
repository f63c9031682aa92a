use anyhow::Context;
use clap::{Parser, Subcommand};
use credit_risk_core::scoring::{HttpScoringClient, PredictionError, ScoringService};
use credit_risk_core::session::PredictionSession;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod form;
mod render;

const EXIT_PREDICTION_FAILED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "credit-risk", about = "Score a loan application against the credit-risk service")]
struct Args {
    /// Scoring service base URL. Overrides CREDIT_RISK_API_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit an application and show the default-risk assessment.
    Predict {
        #[command(flatten)]
        form: form::ApplicationForm,

        /// Print the assessment as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },
    /// Report whether the scoring service is reachable.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = credit_risk_core::config::Settings::from_env()?;
    if let Some(base_url) = args.base_url {
        settings = settings.with_api_url(base_url);
        settings.validate()?;
    }
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let client = HttpScoringClient::from_settings(&settings)?;

    match args.command {
        Command::Health => {
            let healthy = client.health_check().await;
            println!("{}", render::status_line(healthy, client.base_url()));
            Ok(if healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Predict { form, json } => {
            let mut session = PredictionSession::new(client);

            let healthy = session.check_health().await;
            let status = render::status_line(healthy, session.service().base_url());
            if json {
                eprintln!("{status}");
            } else {
                println!("{status}\n");
            }

            let outcome = match form.to_input() {
                Ok(input) => session.submit(&input).await,
                Err(err) => Err(PredictionError::from(err)),
            };

            match outcome {
                Ok(assessment) => {
                    if json {
                        let out = serde_json::to_string_pretty(&assessment)
                            .context("failed to serialize assessment")?;
                        println!("{out}");
                    } else {
                        println!("Prediction completed successfully!\n");
                        print!("{}", render::report(&assessment));
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    let kind = err.kind();
                    let message = err.user_message();
                    sentry_anyhow::capture_anyhow(&anyhow::Error::new(err));
                    tracing::error!(kind, "prediction failed");
                    eprintln!("{message}");
                    Ok(ExitCode::from(EXIT_PREDICTION_FAILED))
                }
            }
        }
    }
}

fn init_sentry(settings: &credit_risk_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
