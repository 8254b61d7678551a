use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use wxdash_core::{Config, Dashboard, FileCityStore, OpenWeatherClient, SearchOutcome, WeatherApi};

use crate::presenter::TerminalPresenter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxdash", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key used for live requests.
    Configure,

    /// Show current weather and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "Colombo".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => show(Some(city)).await,
            // No subcommand: startup flow with the last searched city.
            None => show(None).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    tracing::debug!(?city, "starting dashboard flow");

    let config = Config::load()?;

    let client = config
        .credential()
        .map(|key| Box::new(OpenWeatherClient::new(key)) as Box<dyn WeatherApi>);

    let dashboard = Dashboard::new(client, Box::new(FileCityStore::new()?));
    let mut presenter = TerminalPresenter;

    let outcome = match city {
        Some(city) => dashboard.search(&city, &mut presenter).await,
        None => dashboard.initialize(&mut presenter).await,
    };

    // The presenter already reported the failure; just set the exit code.
    if outcome == SearchOutcome::Failed {
        std::process::exit(1);
    }

    Ok(())
}
