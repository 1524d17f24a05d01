mod auth;
mod cli;
mod config;
mod dci;
mod error;
mod output;
mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting dcilens");
    cli.execute().await?;

    Ok(())
}
