use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;

use quake_alert::cli::{Cli, Command};
use quake_alert::config::Config;
use quake_alert::error::AppError;
use quake_alert::feed::LookbackWindow;
use quake_alert::job::CheckJob;
use quake_alert::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let Command::Check { minutes, dry_run } = cli.command;

    let config = Config::from_env().map_err(AppError::Config)?;
    tracing::debug!(
        feed_url = %config.feed.url,
        subscribers = config.mail.subscribers.len(),
        dry_run,
        "Configuration loaded"
    );

    let window = LookbackWindow::new(minutes)
        .ok_or_else(|| AppError::Config("lookback window must be at least one minute".into()))?;

    let job = CheckJob::from_config(&config, dry_run)?;
    job.run(window, Utc::now()).await?;

    Ok(())
}
