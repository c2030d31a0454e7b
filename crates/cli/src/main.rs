//! Brew Concierge CLI - database migrations and reference data.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bc-cli migrate
//!
//! # Validate and load reference data
//! bc-cli seed crates/cli/data/reference_data.yaml
//!
//! # Validate only
//! bc-cli seed crates/cli/data/reference_data.yaml --check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bc-cli")]
#[command(author, version, about = "Brew Concierge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load reference data from a YAML file
    Seed {
        /// Path to the reference-data file
        file: String,

        /// Validate the file without touching the database
        #[arg(long)]
        check: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, check } => commands::seed::reference_data(&file, check).await?,
    }
    Ok(())
}
