//! Database command handlers for the CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use foodfinder_core::{load_csv_dataset, AppConfig, RecordStore};

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load a CSV file into the restaurants table
    Seed {
        /// CSV file to import
        #[arg(long)]
        file: PathBuf,
        /// Parse and normalize the file without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
}

pub(crate) async fn run(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            let pool = foodfinder_db::connect_pool_from_config(config).await?;
            foodfinder_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let pool = foodfinder_db::connect_pool_from_config(config).await?;
            let applied = foodfinder_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { file, dry_run } => run_seed(config, &file, dry_run).await?,
    }
    Ok(())
}

/// Normalize `file` and upsert its records.
///
/// The file goes through the same encoding fallback as the server's CSV
/// loader; rows without a usable rating or cost are skipped.
async fn run_seed(config: &AppConfig, file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let (dir, name) = split_file_path(file)?;
    let loaded = load_csv_dataset(dir, &[name])?;
    let (store, stats) = RecordStore::from_raw(loaded.rows);
    tracing::info!(
        path = %loaded.path.display(),
        encoding = %loaded.encoding,
        kept = stats.kept,
        dropped_rating = stats.dropped_rating,
        dropped_cost = stats.dropped_cost,
        "parsed seed file"
    );

    if dry_run {
        println!(
            "dry-run: would seed {} of {} rows from {}",
            stats.kept,
            stats.total_rows,
            file.display()
        );
        return Ok(());
    }

    let pool = foodfinder_db::connect_pool_from_config(config).await?;
    foodfinder_db::run_migrations(&pool).await?;
    let written = foodfinder_db::insert_restaurants(&pool, store.records()).await?;
    println!("seeded {written} restaurants ({} rows skipped)", stats.total_rows - stats.kept);
    Ok(())
}

fn split_file_path(file: &Path) -> anyhow::Result<(&Path, &str)> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", file.display()))?;
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    Ok((dir, name))
}
