use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod commands;
mod error;
mod llm;
mod routes;
mod services;
mod settings;
mod utils;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("manas=info".parse()?))
        .init();

    let cli = Cli::parse();

    info!("starting manas");

    let settings = settings::Settings::from_env()?;

    match cli.command {
        Command::Serve { host, port } => commands::serve::run(settings, &host, port).await,
        Command::Analyze { image, query, json } => {
            commands::analyze::run(settings, image.as_deref(), query, json).await
        }
    }
}
