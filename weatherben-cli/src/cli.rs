use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use weatherben_core::{Config, JsonFileHistory, WeatherApp, provider::provider_from_config, ticker};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherben", version, about = "WeatherBen weather lookup")]
pub struct Cli {
    /// Log lookups and history changes to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to an interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search, browse history and toggle the display mode interactively.
    Interactive,

    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city and record it in history.
    Show {
        /// City name.
        city: String,

        /// Optional ISO country code, e.g. "TH".
        #[arg(long, short)]
        country: Option<String>,
    },

    /// Print the Southeast Asia news strip.
    News,

    /// Inspect or edit search history.
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List past searches.
    List,

    /// Delete one entry by id.
    Delete { id: u64 },

    /// Look an entry up again without adding a new one.
    Replay { id: u64 },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            command => {
                let config = Config::load()?;
                let mut app = build_app(&config)?;
                execute(&mut app, command).await
            }
        }
    }
}

async fn execute(app: &mut WeatherApp, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Interactive => interactive::run(app).await?,
        Command::Configure => configure()?,
        Command::Show { city, country } => {
            app.set_input(city, country.unwrap_or_default());
            let result = app.handle_search().await;
            println!("{}", render::lookup_result(app));
            result.context("Weather lookup failed")?;
        }
        Command::News => {
            let items = ticker::fetch_news(app.provider()).await;
            println!("{}", ticker::format_strip(&items));
        }
        Command::History { action } => match action {
            HistoryCommand::List => println!("{}", render::history(app.history())),
            HistoryCommand::Delete { id } => {
                if app.handle_delete_history(id) {
                    println!("Deleted history entry {id}.");
                } else {
                    println!("No history entry with id {id}.");
                }
            }
            HistoryCommand::Replay { id } => {
                let entry = app
                    .history_entry(id)
                    .cloned()
                    .with_context(|| format!("No history entry with id {id}"))?;
                let result = app.handle_history_search(&entry).await;
                println!("{}", render::lookup_result(app));
                result.context("Weather lookup failed")?;
            }
        },
    }

    Ok(())
}

/// Wire the OpenWeather provider and the history file into an app.
fn build_app(config: &Config) -> anyhow::Result<WeatherApp> {
    let provider = provider_from_config(config, Config::api_key_from_env())?;
    let history_path = config.history_file_path()?;
    tracing::debug!(path = %history_path.display(), "using history file");

    WeatherApp::new(Arc::new(provider), Box::new(JsonFileHistory::new(history_path)))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}
