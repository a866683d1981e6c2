use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read coordinates file {path}: {source}")]
    CoordinatesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse coordinates file: {0}")]
    CoordinatesFileParse(#[from] serde_yaml::Error),

    #[error("invalid coordinate for {city:?}: ({latitude}, {longitude}) is out of range")]
    CoordinateOutOfRange {
        city: String,
        latitude: f64,
        longitude: f64,
    },
}

/// Failures while reading the restaurant dataset at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not load dataset. Checked: {}", display_paths(.attempted))]
    NoDataset { attempted: Vec<PathBuf> },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Client-input errors raised while turning request parameters into a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
