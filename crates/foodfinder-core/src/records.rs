//! Restaurant records and load-time normalization.

use std::{collections::HashSet, ops::Deref};

use serde::{Deserialize, Serialize};

/// One normalized row of the dataset. `rating` and `cost` are always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: i64,
    pub name: String,
    pub rating: f64,
    pub city: String,
    /// Cost for two, in rupees.
    pub cost: f64,
    pub cuisine: String,
    pub address: String,
    pub link: String,
}

/// A row exactly as a supplier read it, before numeric coercion.
///
/// Both the CSV reader and the SQL reader produce this shape so they share
/// one normalization path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRestaurantRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub city: Option<String>,
    pub cost: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub link: Option<String>,
}

/// Counters produced by [`normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub total_rows: usize,
    pub kept: usize,
    pub dropped_rating: usize,
    pub dropped_cost: usize,
}

/// Coerce raw rows into [`RestaurantRecord`]s.
///
/// Rows whose `rating` or `cost` is missing, non-numeric or non-finite are
/// dropped. A source `id` is kept the first time it appears. Rows without a
/// usable integer `id`, or repeating one already taken, are numbered upward
/// from the largest source id so every kept record has a distinct id. Input
/// order is preserved.
#[must_use]
pub fn normalize(rows: Vec<RawRestaurantRow>) -> (Vec<RestaurantRecord>, NormalizeStats) {
    let mut stats = NormalizeStats {
        total_rows: rows.len(),
        ..NormalizeStats::default()
    };
    let mut kept = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(rating) = coerce_f64(row.rating.as_deref()) else {
            stats.dropped_rating += 1;
            continue;
        };
        let Some(cost) = coerce_f64(row.cost.as_deref()) else {
            stats.dropped_cost += 1;
            continue;
        };
        kept.push((coerce_id(row.id.as_deref()), rating, cost, row));
    }

    let mut next_id = kept
        .iter()
        .filter_map(|(id, ..)| *id)
        .max()
        .unwrap_or(0)
        .max(0)
        .saturating_add(1);
    let mut taken = HashSet::with_capacity(kept.len());

    let records: Vec<RestaurantRecord> = kept
        .into_iter()
        .map(|(source_id, rating, cost, row)| {
            let id = match source_id {
                Some(id) if taken.insert(id) => id,
                _ => {
                    let id = next_id;
                    next_id = next_id.saturating_add(1);
                    taken.insert(id);
                    id
                }
            };
            RestaurantRecord {
                id,
                name: text(row.name),
                rating,
                city: text(row.city),
                cost,
                cuisine: text(row.cuisine),
                address: text(row.address),
                link: text(row.link),
            }
        })
        .collect();

    stats.kept = records.len();
    (records, stats)
}

/// Parse a numeric cell. Blanks, `NaN`, infinities and formatted numbers
/// such as `"1,200"` are rejected.
fn coerce_f64(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

fn coerce_id(raw: Option<&str>) -> Option<i64> {
    let value = coerce_f64(raw)?;
    // Ids exported through a float column arrive as "12.0".
    #[allow(clippy::cast_possible_truncation)]
    let truncated = value as i64;
    #[allow(clippy::cast_precision_loss)]
    let exact = (truncated as f64 - value).abs() < f64::EPSILON;
    exact.then_some(truncated)
}

fn text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// The process-wide, read-only restaurant snapshot.
///
/// Built once at startup and shared by reference; nothing mutates it.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<RestaurantRecord>,
}

impl RecordStore {
    #[must_use]
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        Self { records }
    }

    /// Normalize raw rows and wrap the result.
    #[must_use]
    pub fn from_raw(rows: Vec<RawRestaurantRow>) -> (Self, NormalizeStats) {
        let (records, stats) = normalize(rows);
        (Self::new(records), stats)
    }

    #[must_use]
    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }
}

impl Deref for RecordStore {
    type Target = [RestaurantRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}
