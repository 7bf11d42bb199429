use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "manas", version, about = "Supportive mental health image and text analysis backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "MANAS_HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "MANAS_PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Analyze one query (and optional local image) and print the result
    Analyze {
        /// Path to an image file to include
        #[arg(long)]
        image: Option<PathBuf>,

        /// The question to ask
        #[arg(long)]
        query: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}
