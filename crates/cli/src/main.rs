//! Recipe Book CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (collections and session table)
//! rb-cli migrate
//!
//! # Insert 50 synthetic recipes
//! rb-cli seed
//!
//! # Insert a custom number of recipes
//! rb-cli seed --count 200
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with synthetic recipes

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use recipe_book_web::seed::DEFAULT_SEED_COUNT;

mod commands;

#[derive(Parser)]
#[command(name = "rb-cli")]
#[command(author, version, about = "Recipe Book CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with synthetic recipes (appends on every run)
    Seed {
        /// Number of recipes to insert
        #[arg(short, long, default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,
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
        Commands::Seed { count } => commands::seed::recipes(count).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_count_defaults_to_fifty() {
        let cli = Cli::try_parse_from(["rb-cli", "seed"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Commands::Seed { count: 50 }));

        let cli = Cli::try_parse_from(["rb-cli", "seed", "--count", "3"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Commands::Seed { count: 3 }));
    }
}
