//! Static city-label to coordinate table used by the geo filters.
//!
//! Lookups are exact and case-sensitive. Composite labels such as
//! `"Governorpet,Vijayawada"` are separate keys; a miss means the city's
//! coordinates are unknown, which callers treat as "outside every geo filter".

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::ConfigError;

const BUILTIN_CITIES: &[(&str, f64, f64)] = &[
    ("Mumbai", 19.0760, 72.8777),
    ("Delhi", 28.6139, 77.2090),
    ("Bangalore", 12.9716, 77.5946),
    ("Hyderabad", 17.3850, 78.4867),
    ("Chennai", 13.0827, 80.2707),
    ("Kolkata", 22.5726, 88.3639),
    ("Pune", 18.5204, 73.8567),
    ("Ahmedabad", 23.0225, 72.5714),
    ("Jaipur", 26.9124, 75.7873),
    ("Surat", 21.1702, 72.8311),
    // Andhra Pradesh
    ("Gudivada", 16.4404, 81.0485),
    ("Guntur", 16.3067, 80.4365),
    ("Kakinada", 16.9891, 82.2477),
    ("Nellore", 14.4426, 79.9865),
    ("Tirupati", 13.6288, 79.4192),
    ("Visakhapatnam", 17.6868, 83.2185),
    ("Vijayawada", 16.5062, 80.6480),
    // Area-level labels as they appear in the dataset
    ("Benz Circle and Auto Nagar,Vijayawada", 16.5062, 80.6480),
    ("Governorpet,Vijayawada", 16.5062, 80.6480),
    ("Bikaner", 28.0229, 73.3117),
    ("Noida-1", 28.5355, 77.3910),
    ("Indirapuram,Delhi", 28.6379, 77.3483),
    ("BTM,Bangalore", 12.9115, 77.6095),
    ("Rohini,Delhi", 28.7320, 77.0633),
    ("Kothrud,Pune", 18.5081, 73.8057),
    ("Indiranagar,Bangalore", 12.9794, 77.6408),
    ("Electronic City,Bangalore", 12.8450, 77.6600),
    ("Greater Kailash 2,Delhi", 28.5436, 77.2489),
    ("Vashi,Mumbai", 19.0748, 73.0785),
    ("Kukatpally,Hyderabad", 17.4849, 78.4163),
    ("Viman Nagar,Pune", 18.5675, 73.9140),
    ("Koramangala,Bangalore", 12.9345, 77.6226),
    ("Laxmi Nagar,Delhi", 28.6420, 77.3160),
    ("Gomti Nagar,Lucknow", 26.8467, 80.9462),
    ("Malviya Nagar,Delhi", 28.5254, 77.2063),
    ("HSR,Bangalore", 12.9081, 77.6474),
    ("Madhapur,Hyderabad", 17.4485, 78.3915),
    ("Wakad,Pune", 18.5984, 73.7673),
];

/// Immutable city-label to [`Coordinate`] mapping.
#[derive(Debug, Clone, Default)]
pub struct CityCoordinates {
    entries: HashMap<String, Coordinate>,
}

#[derive(Debug, Deserialize)]
struct CoordinatesFile {
    cities: BTreeMap<String, [f64; 2]>,
}

impl CityCoordinates {
    /// The hand-maintained table shipped with the service.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_CITIES
            .iter()
            .map(|&(city, lat, lng)| (city.to_string(), Coordinate::new(lat, lng)))
            .collect();
        Self { entries }
    }

    /// Build a table from arbitrary entries, rejecting out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CoordinateOutOfRange`] for the first entry whose
    /// latitude or longitude is not a valid decimal-degree value.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: Into<String>,
    {
        let mut map = HashMap::new();
        for (city, coordinate) in entries {
            let city = city.into();
            if !coordinate.is_valid() {
                return Err(ConfigError::CoordinateOutOfRange {
                    city,
                    latitude: coordinate.latitude,
                    longitude: coordinate.longitude,
                });
            }
            map.insert(city, coordinate);
        }
        Ok(Self { entries: map })
    }

    /// Load a table from a YAML file of the form
    /// `cities: { "Mumbai": [19.0760, 72.8777] }`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or contains
    /// an out-of-range coordinate.
    pub fn load_yaml(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::CoordinatesFileIo {
                path: path.display().to_string(),
                source: e,
            })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a table from YAML text. See [`CityCoordinates::load_yaml`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on parse failure or out-of-range coordinates.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: CoordinatesFile = serde_yaml::from_str(content)?;
        Self::from_entries(
            file.cities
                .into_iter()
                .map(|(city, [lat, lng])| (city, Coordinate::new(lat, lng))),
        )
    }

    /// Exact, verbatim lookup of a city label.
    #[must_use]
    pub fn lookup(&self, city: &str) -> Option<Coordinate> {
        self.entries.get(city).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
