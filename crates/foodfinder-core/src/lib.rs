pub mod app_config;
pub mod config;
pub mod coordinates;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod query;
pub mod records;
pub mod report;

pub use app_config::{AppConfig, DataSource, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use coordinates::CityCoordinates;
pub use dataset::{load_csv_dataset, LoadedDataset, TextEncoding, DEFAULT_DATASET_FILES};
pub use error::{ConfigError, LoadError, QueryError};
pub use geo::{distance_km, haversine_km, BoundingBox, Coordinate, EARTH_RADIUS_KM};
pub use query::{execute, GeoFilter, QueryParams, QuerySpec, API_PAGE_SIZE};
pub use records::{normalize, NormalizeStats, RawRestaurantRow, RecordStore, RestaurantRecord};
pub use report::{star_count, summary_lines, FilterOptions, ReportRow};
