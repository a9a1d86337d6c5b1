use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mock_interview::capability::Capabilities;
use mock_interview::config::{CapabilityBackend, Config};
use mock_interview::llm_client;
use mock_interview::runner::{load_answers, load_profile, run_scripted};

/// Runs a scripted mock interview and prints the report as JSON.
#[derive(Parser)]
#[command(name = "mock-interview", version)]
#[command(about = "Adaptive mock interview engine", long_about = None)]
struct Cli {
    /// Candidate profile JSON (skills, experience, target role, requirements)
    profile: PathBuf,
    /// Scripted answers JSON: an array of {text, elapsed_seconds}
    answers: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration next; bad values fail before anything runs
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting mock-interview v{}", env!("CARGO_PKG_VERSION"));

    let profile = load_profile(&cli.profile)?;
    let answers = load_answers(&cli.answers)?;
    info!(
        "Loaded profile for '{}' with {} scripted answers",
        profile.target_role,
        answers.len()
    );

    let capabilities = Capabilities::from_config(&config)?;
    if config.backend == CapabilityBackend::Llm {
        info!("LLM model: {}", llm_client::MODEL);
    }

    let report = run_scripted(profile, config.interview.clone(), capabilities, &answers).await?;

    let rendered = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{rendered}");

    Ok(())
}
