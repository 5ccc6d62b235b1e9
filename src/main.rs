//! docqa - Terminal client for a document question-answering service
//!
#![doc = "Main entry point for the docqa client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docqa::cli::{Cli, Commands};
use docqa::commands;
use docqa::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Ask { question, json } => {
            tracing::info!("Asking one-shot question");
            commands::ask::run_ask(config, question, json).await?;
            Ok(())
        }
        Commands::Chat => {
            tracing::info!("Starting interactive chat session");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Evaluate {
            file,
            default_rubric,
            thoughts,
            supporting,
        } => {
            tracing::info!("Starting rubric evaluation");
            if let Some(f) = &file {
                tracing::debug!("Using stored rubric file: {}", f);
            }
            if default_rubric {
                tracing::debug!("Using the backend default rubric");
            }
            commands::evaluate::run_evaluate(config, file, default_rubric, thoughts, supporting)
                .await?;
            Ok(())
        }
        Commands::Upload { path } => {
            tracing::info!("Uploading file: {}", path.display());
            commands::upload::run_upload(config, path).await?;
            Ok(())
        }
        Commands::Files => {
            commands::files::run_files(config).await?;
            Ok(())
        }
        Commands::Info => {
            commands::info::run_info(config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "docqa=debug" } else { "docqa=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
