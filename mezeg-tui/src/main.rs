//! Binary crate for the `mezeg` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive locality/weather lookup screen
//! - Human-friendly history output

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod combobox;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
