//! commitcast - CLI entry point.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing::info;

use commitcast::cli::Cli;
use commitcast::llm::GeminiClient;
use commitcast::notify::{EmailNotifier, Notifier};
use commitcast::pipeline::{report_config_failure, run_and_report};
use commitcast::runlog::RunLog;
use commitcast::{Config, RunOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let run_log = RunLog::create(&cli.log_dir, Local::now());
    run_log.section(
        "Run Started",
        format!(
            "Frequency: {}, Repo: {}",
            cli.frequency,
            cli.repo_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unset>".to_string())
        ),
    );
    info!("Starting commitcast...");

    // Step 1: Validate configuration
    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            // Email settings may still be usable even if something else is wrong.
            let notifier = EmailNotifier::from_cli(&cli);
            let err = report_config_failure(
                &cli,
                err,
                notifier.as_ref().map(|n| n as &dyn Notifier),
                &run_log,
            )
            .await;
            return Err(err.into());
        }
    };

    // Step 2: Build clients
    let llm = GeminiClient::new(&config.gemini, config.http_timeout)
        .context("Failed to build Gemini client")?;
    let notifier = config
        .email
        .clone()
        .map(|settings| EmailNotifier::new(settings, config.http_timeout));

    // Step 3: Run the pipeline
    let outcome = run_and_report(
        &config,
        &llm,
        notifier.as_ref().map(|n| n as &dyn Notifier),
        &run_log,
        Utc::now(),
    )
    .await?;

    match outcome {
        RunOutcome::NoCommits => {
            println!("No commits found for the {} window. Nothing sent.", config.frequency);
        }
        RunOutcome::DryRun(summary) => {
            println!("--- Summary Start ({}) ---", summary.source);
            println!("{}", summary.text);
            println!("--- Summary End ---");
        }
        RunOutcome::Delivered { source, chunks } => {
            println!("✓ Posted {} summary in {} message(s)", source, chunks);
        }
    }

    run_log.section("Run Finished Successfully", "------");
    info!("commitcast finished successfully.");

    Ok(())
}
