use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(about = "Chat with a local OpenAI-compatible model service")]
#[command(version)]
struct Cli {
    /// Run a single prompt and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Model service base URL (overrides MODEL_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Model name sent with each completion request
    #[arg(short, long)]
    model: Option<String>,

    /// Read settings from this file instead of the user config
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => {
            let mut settings = chatbot_core::Settings::load_from(path)?;
            settings.apply_env(|key| std::env::var(key).ok());
            settings
        }
        None => chatbot_core::Settings::load(),
    };

    if let Some(endpoint) = cli.endpoint {
        settings.endpoint.base_url = endpoint;
    }
    if let Some(model) = cli.model {
        settings.model.name = model;
    }

    match cli.prompt {
        Some(prompt) => app::run_single_prompt(settings, &prompt).await,
        None => app::run_chat(settings).await,
    }
}
