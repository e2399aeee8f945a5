use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    interpret, load_settings, Phase, PredictionClient, SelectedFile, Settings,
    SubmissionController,
};
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser, Debug)]
#[command(about = "Submit a sensor log and print the remaining-useful-life verdict")]
struct Cli {
    /// Base URL of the prediction service.
    #[arg(long)]
    server_url: Option<String>,
    /// Config file to read instead of the default search path.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// RUL at which the gauge renders full.
    #[arg(long)]
    gauge_ceiling: Option<f64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a CSV sensor log and print the verdict.
    Predict { file: PathBuf },
    /// Check that the prediction service is reachable.
    Health,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(self.config.as_deref());
        if let Some(url) = &self.server_url {
            settings.server_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout_secs = secs;
        }
        if let Some(ceiling) = self.gauge_ceiling {
            settings.gauge_ceiling = ceiling;
        }
        settings.validate().context("invalid client settings")?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = cli.settings()?;
    let client = PredictionClient::from_settings(&settings)
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    match cli.command {
        Command::Predict { file } => {
            let selected = SelectedFile::new(file);
            if !selected.has_csv_suffix() {
                tracing::warn!(file = selected.display_name(), "file does not end in .csv");
            }

            let mut controller = SubmissionController::new(client);
            controller.select_file(selected);
            controller.submit().await;

            match controller.state().phase() {
                Phase::Succeeded(result) => {
                    let display = interpret(result, settings.gauge_scale());
                    println!("{}", report::render(result, &display));
                }
                Phase::Failed(message) => bail!("{message}"),
                other => bail!("submission ended in unexpected phase '{}'", other.label()),
            }
        }
        Command::Health => {
            let health = client
                .health()
                .await
                .map_err(|err| anyhow::anyhow!("{}: {err}", err.user_message()))?;
            if !health.is_healthy() {
                bail!("prediction service at {} reports '{}'", client.server_url(), health.status);
            }
            println!("prediction service at {} is {}", client.server_url(), health.status);
        }
    }

    Ok(())
}
