use crate::app_config::{AppConfig, DataSource, Environment};
use crate::dataset::DEFAULT_DATASET_FILES;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FOODFINDER_ENV", "development"));
    let bind_addr = parse_addr("FOODFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FOODFINDER_LOG_LEVEL", "info");

    let data_source = parse_data_source(&or_default("FOODFINDER_DATA_SOURCE", "csv"))?;
    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
    if data_source == DataSource::Database && database_url.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let data_dir = PathBuf::from(or_default("FOODFINDER_DATA_DIR", "."));
    let dataset_files = parse_dataset_files(&or_default(
        "FOODFINDER_DATASET_FILES",
        &DEFAULT_DATASET_FILES.join(","),
    ))?;
    let city_coordinates_path = lookup("FOODFINDER_CITY_COORDINATES_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let db_max_connections = parse_u32("FOODFINDER_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("FOODFINDER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FOODFINDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let request_timeout_secs = parse_u64("FOODFINDER_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_source,
        database_url,
        data_dir,
        dataset_files,
        city_coordinates_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        request_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_data_source(s: &str) -> Result<DataSource, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "csv" => Ok(DataSource::Csv),
        "database" | "db" => Ok(DataSource::Database),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOODFINDER_DATA_SOURCE".to_string(),
            reason: format!("expected `csv` or `database`, got `{other}`"),
        }),
    }
}

fn parse_dataset_files(raw: &str) -> Result<Vec<String>, ConfigError> {
    let files: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if files.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODFINDER_DATASET_FILES".to_string(),
            reason: "at least one dataset file name is required".to_string(),
        });
    }

    Ok(files)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
