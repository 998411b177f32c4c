mod auth;
mod cli;
mod config;
mod error;
mod providers;
mod results;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting circlog - CircleCI benchmark log locator");
    cli.execute().await?;

    Ok(())
}
