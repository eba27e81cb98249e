use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use rain_core::{
    Config, DiscordWebhook, OpenWeatherProvider, Verbosity,
    run::{preview, run},
};
use tracing::instrument::WithSubscriber;

use crate::logging;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "will-it-rain",
    version,
    about = "Posts tomorrow's commute rain forecast to a Discord webhook"
)]
pub struct Cli {
    /// TOML config file. Defaults to the platform config directory; environment
    /// variables override its values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log fetched data and payloads.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Fetch tomorrow's forecast and post both messages (default).
    Run,

    /// Fetch tomorrow's forecast and print both payloads without posting.
    Preview,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Run);
        let config = self.load_config();

        // An invalid config still gets logged, at the level `--debug` asks for.
        let verbosity = match &config {
            Ok(config) => config.verbosity(),
            Err(_) if self.debug => Verbosity::Debug,
            Err(_) => Verbosity::Normal,
        };

        invoke(command, config)
            .with_subscriber(logging::subscriber(verbosity))
            .await
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref()).context("Invalid configuration")?;
        if self.debug {
            config.debug = true;
        }
        Ok(config)
    }
}

/// Runs one invocation and logs its failure, whatever the stage.
async fn invoke(command: Command, config: anyhow::Result<Config>) -> anyhow::Result<()> {
    let result = match config {
        Ok(config) => execute(command, &config).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        let message = format!("{err:#}");
        tracing::error!(error = %message, "Execution failed");
    }

    result
}

async fn execute(command: Command, config: &Config) -> anyhow::Result<()> {
    tracing::debug!(
        ?command,
        outbound = ?config.outbound,
        inbound = ?config.inbound,
        threshold = config.rain_threshold,
        "Starting"
    );

    let now = Local::now();
    let provider = OpenWeatherProvider::new(config.owm_api_key.clone());

    match command {
        Command::Run => {
            let webhook = DiscordWebhook::new(config.discord_webhook_url.clone());
            run(config, &provider, &webhook, &now).await?;
        }
        Command::Preview => {
            let notifications = preview(config, &provider, &now).await?;

            println!("{}", serde_json::to_string_pretty(&notifications.detailed)?);
            println!("{}", serde_json::to_string_pretty(&notifications.verdict)?);
        }
    }

    Ok(())
}
