//! Great-circle distance and bounding-box helpers.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both components are finite and within
    /// `[-90, 90]` / `[-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Inclusive latitude/longitude box, as sent by a map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&point.latitude)
            && (self.lng_min..=self.lng_max).contains(&point.longitude)
    }
}

/// Great-circle distance in kilometers between two points given in decimal
/// degrees.
///
/// The haversine term is clamped to `[0, 1]` so rounding error near
/// antipodal points cannot push `asin` out of its domain.
///
/// ```
/// use foodfinder_core::distance_km;
///
/// let mumbai_to_delhi = distance_km(19.0760, 72.8777, 28.6139, 77.2090);
/// assert!((mumbai_to_delhi - 1150.0).abs() < 10.0);
/// ```
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// [`distance_km`] over two [`Coordinate`]s.
#[inline]
#[must_use]
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    distance_km(from.latitude, from.longitude, to.latitude, to.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MUMBAI: Coordinate = Coordinate::new(19.0760, 72.8777);
    const DELHI: Coordinate = Coordinate::new(28.6139, 77.2090);
    const BANGALORE: Coordinate = Coordinate::new(12.9716, 77.5946);

    #[test]
    fn mumbai_to_delhi_is_about_1150_km() {
        let distance = haversine_km(&MUMBAI, &DELHI);
        assert!((distance - 1150.0).abs() < 10.0, "Mumbai-Delhi: {distance}");
    }

    #[test]
    fn mumbai_to_bangalore_is_about_840_km() {
        let distance = haversine_km(&MUMBAI, &BANGALORE);
        assert!((distance - 840.0).abs() < 10.0, "Mumbai-Bangalore: {distance}");
    }

    #[test]
    fn same_point_is_zero() {
        assert!(haversine_km(&MUMBAI, &MUMBAI).abs() < 1e-9);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let distance = distance_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!(distance.is_finite());
        assert!((distance - half).abs() < 1e-6, "antipodal: {distance}");
    }

    #[test]
    fn pole_to_pole_is_finite() {
        let distance = distance_km(90.0, 0.0, -90.0, 0.0);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn bounding_box_is_inclusive() {
        let bounds = BoundingBox {
            lat_min: 19.0760,
            lat_max: 20.0,
            lng_min: 72.0,
            lng_max: 72.8777,
        };
        assert!(bounds.contains(&MUMBAI));
        assert!(!bounds.contains(&DELHI));
    }

    #[test]
    fn coordinate_validity() {
        assert!(MUMBAI.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(a in coordinate()) {
            prop_assert!(haversine_km(&a, &a).abs() < 1e-6);
        }

        #[test]
        fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
            let ab = haversine_km(&a, &b);
            let ba = haversine_km(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-6, "ab={} ba={}", ab, ba);
        }

        #[test]
        fn distance_is_bounded(a in coordinate(), b in coordinate()) {
            let d = haversine_km(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
