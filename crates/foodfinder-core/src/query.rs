//! The restaurant query engine: compound filtering, ranking and pagination.
//!
//! Stages run in a fixed order (search, geo, rating, city, cost) and each one
//! only narrows the working set, so adding a predicate can never grow a
//! result. The engine never mutates the record store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coordinates::CityCoordinates;
use crate::geo::{haversine_km, BoundingBox, Coordinate};
use crate::records::RestaurantRecord;
use crate::QueryError;

/// Maximum number of records returned on the paginated (JSON API) path.
pub const API_PAGE_SIZE: usize = 50;

/// Geographic restriction for a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GeoFilter {
    /// Keep records whose city lies within `radius_km` of `center`.
    Radius { center: Coordinate, radius_km: f64 },
    /// Keep records whose city lies inside the box.
    Bounds(BoundingBox),
}

/// Raw, untyped request parameters as they arrive from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub search: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub lat_min: Option<String>,
    pub lat_max: Option<String>,
    pub lng_min: Option<String>,
    pub lng_max: Option<String>,
    pub min_rating: Option<String>,
    pub selected_city: Option<String>,
    pub max_cost: Option<String>,
}

/// Typed filter specification for one query. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuerySpec {
    pub min_rating: Option<f64>,
    pub selected_city: Option<String>,
    pub max_cost: Option<f64>,
    pub search_query: Option<String>,
    pub geo: Option<GeoFilter>,
}

impl QuerySpec {
    /// Parse request parameters.
    ///
    /// Blank values count as absent. A point and radius take precedence over
    /// a bounding box; an incomplete group of geo parameters is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidNumber`] for any numeric parameter that is
    /// not a finite number.
    pub fn from_params(params: &QueryParams) -> Result<Self, QueryError> {
        let lat = parse_number("lat", params.lat.as_deref())?;
        let lng = parse_number("lng", params.lng.as_deref())?;
        let radius = parse_number("radius", params.radius.as_deref())?;
        let lat_min = parse_number("lat_min", params.lat_min.as_deref())?;
        let lat_max = parse_number("lat_max", params.lat_max.as_deref())?;
        let lng_min = parse_number("lng_min", params.lng_min.as_deref())?;
        let lng_max = parse_number("lng_max", params.lng_max.as_deref())?;

        let geo = match (lat, lng, radius, lat_min, lat_max, lng_min, lng_max) {
            (Some(lat), Some(lng), Some(radius_km), ..) => Some(GeoFilter::Radius {
                center: Coordinate::new(lat, lng),
                radius_km,
            }),
            (_, _, _, Some(lat_min), Some(lat_max), Some(lng_min), Some(lng_max)) => {
                Some(GeoFilter::Bounds(BoundingBox {
                    lat_min,
                    lat_max,
                    lng_min,
                    lng_max,
                }))
            }
            _ => None,
        };

        Ok(Self {
            min_rating: parse_number("min_rating", params.min_rating.as_deref())?,
            selected_city: params.selected_city.clone().filter(|s| !s.is_empty()),
            max_cost: parse_number("max_cost", params.max_cost.as_deref())?,
            search_query: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
            geo,
        })
    }
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, QueryError> {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(QueryError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}

/// Run `spec` over `records` and return the matches ranked by rating,
/// highest first. Equal ratings keep their input order.
///
/// With `paginate` the result is capped at [`API_PAGE_SIZE`] after ranking.
#[must_use]
pub fn execute(
    records: &[RestaurantRecord],
    coordinates: &CityCoordinates,
    spec: &QuerySpec,
    paginate: bool,
) -> Vec<RestaurantRecord> {
    let mut working: Vec<&RestaurantRecord> = records.iter().collect();

    if let Some(query) = spec.search_query.as_deref().filter(|q| !q.trim().is_empty()) {
        let needle = query.to_lowercase();
        working.retain(|r| matches_search(r, &needle));
        tracing::debug!(query, remaining = working.len(), "applied search filter");
    }

    match spec.geo {
        Some(GeoFilter::Radius { center, radius_km }) => {
            let distances = city_distances(&working, coordinates, &center);
            working.retain(|r| distances.get(r.city.as_str()).is_some_and(|d| *d <= radius_km));
            tracing::debug!(
                lat = center.latitude,
                lng = center.longitude,
                radius_km,
                remaining = working.len(),
                "applied radius filter"
            );
        }
        Some(GeoFilter::Bounds(bounds)) => {
            let inside = cities_in_bounds(&working, coordinates, &bounds);
            working.retain(|r| inside.get(r.city.as_str()).copied().unwrap_or(false));
            tracing::debug!(?bounds, remaining = working.len(), "applied bounds filter");
        }
        None => {}
    }

    if let Some(min_rating) = spec.min_rating {
        working.retain(|r| r.rating >= min_rating);
    }
    if let Some(city) = spec.selected_city.as_deref().filter(|c| !c.is_empty()) {
        working.retain(|r| r.city == city);
    }
    if let Some(max_cost) = spec.max_cost {
        working.retain(|r| r.cost <= max_cost);
    }

    // `sort_by` is stable: ties keep their relative input order.
    working.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    if paginate {
        working.truncate(API_PAGE_SIZE);
    }

    working.into_iter().cloned().collect()
}

fn matches_search(record: &RestaurantRecord, needle: &str) -> bool {
    [
        &record.name,
        &record.cuisine,
        &record.city,
        &record.address,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Distance from `center` to each distinct city in `working`, computed once
/// per city. Cities without known coordinates map to infinity.
fn city_distances<'a>(
    working: &[&'a RestaurantRecord],
    coordinates: &CityCoordinates,
    center: &Coordinate,
) -> HashMap<&'a str, f64> {
    let mut distances = HashMap::new();
    for &record in working {
        distances.entry(record.city.as_str()).or_insert_with(|| {
            coordinates
                .lookup(&record.city)
                .map_or(f64::INFINITY, |city| haversine_km(center, &city))
        });
    }
    distances
}

/// Box membership for each distinct city in `working`; unknown cities are outside.
fn cities_in_bounds<'a>(
    working: &[&'a RestaurantRecord],
    coordinates: &CityCoordinates,
    bounds: &BoundingBox,
) -> HashMap<&'a str, bool> {
    let mut inside = HashMap::new();
    for &record in working {
        inside.entry(record.city.as_str()).or_insert_with(|| {
            coordinates
                .lookup(&record.city)
                .is_some_and(|city| bounds.contains(&city))
        });
    }
    inside
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
