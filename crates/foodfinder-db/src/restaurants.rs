//! Database operations for the `restaurants` table.

use foodfinder_core::{RawRestaurantRow, RestaurantRecord};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `restaurants` table with every column read as text.
///
/// Numeric columns are cast in SQL so the row feeds the same normalization
/// path as a CSV row; a NULL rating or cost drops the row at load time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub city: Option<String>,
    pub cost: Option<String>,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub link: Option<String>,
}

impl From<RestaurantRow> for RawRestaurantRow {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            rating: row.rating,
            city: row.city,
            cost: row.cost,
            cuisine: row.cuisine,
            address: row.address,
            link: row.link,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every restaurant row, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn fetch_restaurant_rows(pool: &PgPool) -> Result<Vec<RawRestaurantRow>, DbError> {
    let rows = sqlx::query_as::<_, RestaurantRow>(
        "SELECT id::TEXT AS id, name, rating::TEXT AS rating, city, cost::TEXT AS cost, \
                cuisine, address, link \
         FROM restaurants \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!(rows = rows.len(), "fetched restaurant rows");
    Ok(rows.into_iter().map(RawRestaurantRow::from).collect())
}

/// Returns the number of rows in `restaurants`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_restaurants(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurants")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Upsert normalized records by id.
///
/// Returns the number of records written. All writes run inside a single
/// transaction; if any statement fails the entire batch is rolled back. The
/// id sequence is advanced past the highest stored id afterwards.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn insert_restaurants(
    pool: &PgPool,
    records: &[RestaurantRecord],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for record in records {
        sqlx::query(
            "INSERT INTO restaurants (id, name, rating, city, cost, cuisine, address, link) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 rating = EXCLUDED.rating, \
                 city = EXCLUDED.city, \
                 cost = EXCLUDED.cost, \
                 cuisine = EXCLUDED.cuisine, \
                 address = EXCLUDED.address, \
                 link = EXCLUDED.link, \
                 updated_at = NOW()",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(record.rating)
        .bind(&record.city)
        .bind(record.cost)
        .bind(&record.cuisine)
        .bind(&record.address)
        .bind(&record.link)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('restaurants', 'id'), \
                       GREATEST((SELECT COALESCE(MAX(id), 0) FROM restaurants), 1))",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(count, "seeded restaurants");
    Ok(count)
}
