use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod error;
mod extract;
mod handlers;
mod router;
mod schemas;
#[cfg(test)]
mod tests;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
