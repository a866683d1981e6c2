//! Presentation helpers shared by the report and explore endpoints.

use serde::Serialize;

use crate::query::QuerySpec;
use crate::records::RestaurantRecord;

const NAME_WIDTH: usize = 30;
const CUISINE_WIDTH: usize = 20;
const CITY_WIDTH: usize = 15;
const MAX_STARS: usize = 5;

/// Number of `*` shown next to a rating: rounded half-to-even, clamped to `0..=5`.
#[must_use]
pub fn star_count(rating: f64) -> usize {
    let rounded = rating.round_ties_even();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= 5.0 {
        MAX_STARS
    } else {
        // Integral and within 1..=4 here.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stars = rounded as usize;
        stars
    }
}

/// One fixed-width row of the results report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub rating: String,
    pub cuisine: String,
    pub city: String,
    pub cost: String,
}

impl ReportRow {
    #[must_use]
    pub fn from_record(record: &RestaurantRecord) -> Self {
        let stars = "*".repeat(star_count(record.rating));
        let rating = if stars.is_empty() {
            format!("{:.1}", record.rating)
        } else {
            format!("{:.1} ({stars})", record.rating)
        };

        Self {
            name: truncate_chars(&record.name, NAME_WIDTH),
            rating,
            cuisine: truncate_chars(&record.cuisine, CUISINE_WIDTH),
            city: truncate_chars(&record.city, CITY_WIDTH),
            cost: format!("Rs.{:.0}", record.cost.trunc()),
        }
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Header lines describing a result set: the count, then one line per
/// active rating, city, and cost filter.
#[must_use]
pub fn summary_lines(count: usize, spec: &QuerySpec) -> Vec<String> {
    let mut lines = vec![format!("Results: {count} restaurants")];
    if let Some(min_rating) = spec.min_rating {
        lines.push(format!("Min rating: {min_rating:?}+"));
    }
    if let Some(city) = spec.selected_city.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("City: {city}"));
    }
    if let Some(max_cost) = spec.max_cost {
        lines.push(format!("Max cost: Rs.{:.0} for two", max_cost.trunc()));
    }
    lines
}

/// Distinct values offered by the explore page's filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Highest first.
    pub ratings: Vec<f64>,
    pub cities: Vec<String>,
    pub costs: Vec<f64>,
}

impl FilterOptions {
    #[must_use]
    pub fn from_records(records: &[RestaurantRecord]) -> Self {
        let mut ratings: Vec<f64> = records.iter().map(|r| r.rating).collect();
        ratings.sort_by(|a, b| b.total_cmp(a));
        ratings.dedup();

        let mut cities: Vec<String> = records.iter().map(|r| r.city.clone()).collect();
        cities.sort();
        cities.dedup();

        let mut costs: Vec<f64> = records.iter().map(|r| r.cost).collect();
        costs.sort_by(f64::total_cmp);
        costs.dedup();

        Self {
            ratings,
            cities,
            costs,
        }
    }
}
