mod db;
mod query;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{db::DbCommands, query::QueryArgs};

#[derive(Debug, Parser)]
#[command(name = "foodfinder-cli")]
#[command(about = "Food Finder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database provisioning and seeding
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a restaurant query against the configured dataset
    Query(QueryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = foodfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Db { command }) => db::run(&config, command).await,
        Some(Commands::Query(args)) => query::run_query(&config, &args).await,
        None => {
            println!("foodfinder-cli: use --help to list commands");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
