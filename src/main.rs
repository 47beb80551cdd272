use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use postboard::app::{App, AppEvent};
use postboard::config::Config;
use postboard::posts::PostFetcher;
use postboard::theme::ThemeVariant;
use postboard::ui;

/// Default config file location (~/.config/postboard/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("postboard")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "postboard", about = "Browse remote posts grouped by author")]
struct Args {
    /// URL to fetch posts from (overrides the config file)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Config file to read instead of ~/.config/postboard/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let endpoint = config.resolve_endpoint(args.endpoint.as_deref())?;
    let fetcher = PostFetcher::new(endpoint, config.request_timeout())
        .context("Failed to build HTTP client")?;

    let mut app = App::new(fetcher);

    match ThemeVariant::from_str_name(&config.theme) {
        Some(variant) => app.set_theme(variant),
        None => tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark"),
    }

    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    tracing::info!(endpoint = %app.fetcher.endpoint(), "Starting postboard");

    // Single UI-update channel for background task results
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
