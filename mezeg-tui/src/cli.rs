use anyhow::Context;
use clap::{Parser, Subcommand};

use mezeg_core::{Config, HistoryStore, text::format_timestamp};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "mezeg", version, about = "Current weather for Israeli localities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show past lookups, newest first.
    History {
        /// Remove the entire search history instead of printing it.
        #[arg(long)]
        clear: bool,
    },

    /// Store the WeatherAPI.com API key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            None => crate::app::run_interactive().await,
            Some(Command::History { clear }) => run_history(clear),
            Some(Command::Configure) => run_configure(),
        }
    }
}

fn run_history(clear: bool) -> anyhow::Result<()> {
    let store = HistoryStore::open_default()?;

    if clear {
        store.clear()?;
        println!("Search history cleared.");
        return Ok(());
    }

    let records = store.read_all();
    if records.is_empty() {
        println!("No searches yet. Look up a locality to build a history.");
        return Ok(());
    }

    println!("{:>3}  {:<17}  {:<24}  {}", "#", "Time", "Locality", "Country");
    for (idx, record) in records.iter().rev().enumerate() {
        println!(
            "{:>3}  {:<17}  {:<24}  {}",
            idx + 1,
            format_timestamp(&record.timestamp),
            record.city_name,
            record.country,
        );
    }

    let noun = if records.len() == 1 { "search" } else { "searches" };
    println!("\n{} {noun} total", records.len());
    Ok(())
}

fn run_configure() -> anyhow::Result<()> {
    let mut config = Config::load().unwrap_or_default();

    let key = inquire::Text::new("WeatherAPI.com API key:")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
