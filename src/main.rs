mod auth;
mod cli;
mod config;
mod error;
mod output;
mod pipeline;
mod report;
mod sheets;
mod tracker;
mod transform;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting jirasheets - Jira to Google Sheets exporter");
    cli.execute().await?;

    Ok(())
}
