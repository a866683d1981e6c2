//! Startup snapshot shared by the server and the CLI.

use foodfinder_core::{
    load_csv_dataset, AppConfig, CityCoordinates, DataSource, RawRestaurantRow, RecordStore,
};

use crate::DbError;

/// Build the record store from the configured source.
///
/// A database source that cannot be reached or read falls back to the CSV
/// candidates. Returns the store together with the source it was read from.
///
/// # Errors
///
/// Returns [`DbError::Load`] if the CSV candidates cannot be loaded, either
/// as the configured source or as the fallback.
pub async fn load_store(config: &AppConfig) -> Result<(RecordStore, DataSource), DbError> {
    let (rows, source) = match config.data_source {
        DataSource::Database => match load_database_rows(config).await {
            Ok(rows) => (rows, DataSource::Database),
            Err(e) => {
                tracing::warn!(error = %e, "database load failed; falling back to CSV");
                (load_csv_rows(config)?, DataSource::Csv)
            }
        },
        DataSource::Csv => (load_csv_rows(config)?, DataSource::Csv),
    };

    let (store, stats) = RecordStore::from_raw(rows);
    tracing::info!(
        %source,
        total_rows = stats.total_rows,
        kept = stats.kept,
        dropped_rating = stats.dropped_rating,
        dropped_cost = stats.dropped_cost,
        "record store ready"
    );
    Ok((store, source))
}

async fn load_database_rows(config: &AppConfig) -> Result<Vec<RawRestaurantRow>, DbError> {
    let pool = crate::connect_pool_from_config(config).await?;
    crate::run_migrations(&pool).await?;
    let rows = crate::fetch_restaurant_rows(&pool).await?;
    pool.close().await;
    Ok(rows)
}

fn load_csv_rows(config: &AppConfig) -> Result<Vec<RawRestaurantRow>, DbError> {
    let loaded = load_csv_dataset(&config.data_dir, config.dataset_files.as_slice())?;
    Ok(loaded.rows)
}

/// The configured coordinate table, or the built-in one when no override is set.
///
/// # Errors
///
/// Returns [`DbError::Config`] if the override file cannot be read or parsed.
pub fn load_coordinates(config: &AppConfig) -> Result<CityCoordinates, DbError> {
    let coordinates = match &config.city_coordinates_path {
        Some(path) => CityCoordinates::load_yaml(path)?,
        None => CityCoordinates::builtin(),
    };
    tracing::info!(cities = coordinates.len(), "city coordinate table loaded");
    Ok(coordinates)
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::path::PathBuf;

    use foodfinder_core::Environment;

    use super::*;

    fn config(data_dir: PathBuf) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
            log_level: "info".to_string(),
            data_source: DataSource::Csv,
            database_url: None,
            data_dir,
            dataset_files: vec!["dataset.csv".to_string(), "zomato.csv".to_string()],
            city_coordinates_path: None,
            db_max_connections: 1,
            db_min_connections: 1,
            db_acquire_timeout_secs: 1,
            request_timeout_secs: 30,
        }
    }

    fn write_dataset(dir: &std::path::Path) {
        std::fs::write(
            dir.join("dataset.csv"),
            "id,name,rating,city,cost,cuisine,address,link\n\
             1,Bombay Canteen,4.5,Mumbai,500,Modern Indian,Lower Parel,\n\
             2,No Rating,,Delhi,300,Chaat,CP,\n",
        )
        .expect("write dataset");
    }

    #[tokio::test]
    async fn csv_source_loads_and_normalizes() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_dataset(dir.path());

        let (store, source) = load_store(&config(dir.path().to_path_buf()))
            .await
            .expect("load");
        assert_eq!(source, DataSource::Csv);
        assert_eq!(store.len(), 1);
        assert_eq!(store[0].name, "Bombay Canteen");
    }

    #[tokio::test]
    async fn database_without_url_falls_back_to_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_dataset(dir.path());
        let mut config = config(dir.path().to_path_buf());
        config.data_source = DataSource::Database;

        let (store, source) = load_store(&config).await.expect("fallback load");
        assert_eq!(source, DataSource::Csv);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_dataset_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_store(&config(dir.path().to_path_buf()))
            .await
            .expect_err("no dataset present");
        assert!(matches!(err, DbError::Load(_)));
        assert!(err.to_string().contains("could not load dataset"));
    }

    #[test]
    fn coordinates_default_to_builtin_table() {
        let coordinates = load_coordinates(&config(PathBuf::from("."))).expect("coordinates");
        assert!(coordinates.lookup("Mumbai").is_some());
    }

    #[test]
    fn coordinates_override_replaces_builtin_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cities.yaml");
        std::fs::write(&path, "cities:\n  Atlantis: [0.0, 0.0]\n").expect("write yaml");
        let mut config = config(PathBuf::from("."));
        config.city_coordinates_path = Some(path);

        let coordinates = load_coordinates(&config).expect("coordinates");
        assert!(coordinates.lookup("Atlantis").is_some());
        assert!(coordinates.lookup("Mumbai").is_none());
    }
}
