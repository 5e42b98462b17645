use anyhow::Context;
use clap::{Parser, Subcommand};
use classy_weather_core::{Config, orchestrator_from_config};
use inquire::{CustomType, Text};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "classy-weather", version, about = "Daily forecast for any place name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the daily forecast for a place.
    Show {
        /// Place name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,
    },

    /// Read place names from stdin, one per line, re-rendering on every change.
    ///
    /// Each line replaces the previous one; an empty line clears it.
    Watch,

    /// Interactively set the endpoint URLs and request timeout.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { place } => show(&place.join(" ")).await,
            Command::Watch => watch().await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(place: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let orchestrator =
        orchestrator_from_config(&config).context("Failed to set up the HTTP client")?;

    let view = orchestrator.search(place).await;
    print!("{}", output::render(&view));

    Ok(())
}

async fn watch() -> anyhow::Result<()> {
    let config = Config::load()?;
    let orchestrator =
        orchestrator_from_config(&config).context("Failed to set up the HTTP client")?;

    let mut rx = orchestrator.subscribe();
    print!("{}", output::render(&rx.borrow_and_update()));

    let renderer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let view = rx.borrow_and_update().clone();
            print!("{}", output::render(&view));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        // Repeating the current query is not an input change.
        if let Some(ticket) = orchestrator.change_query(line) {
            // Cycles run concurrently; a stale one can only drop its own result.
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run(ticket).await });
        }
    }

    // The renderer stops once every cycle task has released its handle.
    drop(orchestrator);
    renderer.await.context("Renderer task failed")?;

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.geocoding_base_url = Text::new("Geocoding base URL:")
        .with_default(&config.geocoding_base_url)
        .prompt()?;

    config.forecast_base_url = Text::new("Forecast base URL:")
        .with_default(&config.forecast_base_url)
        .prompt()?;

    let timeout = CustomType::<u64>::new("Request timeout in seconds (0 = none):")
        .with_default(config.timeout_secs.unwrap_or(0))
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;
    config.timeout_secs = (timeout > 0).then_some(timeout);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
