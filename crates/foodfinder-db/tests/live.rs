//! Live integration tests for foodfinder-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/foodfinder-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use foodfinder_core::{normalize, RestaurantRecord};
use foodfinder_db::{count_restaurants, fetch_restaurant_rows, health_check, insert_restaurants};

fn record(id: i64, name: &str, city: &str, rating: f64, cost: f64) -> RestaurantRecord {
    RestaurantRecord {
        id,
        name: name.to_string(),
        rating,
        city: city.to_string(),
        cost,
        cuisine: "Cafe".to_string(),
        address: format!("{id} Main Road"),
        link: format!("https://example.com/{id}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_check_succeeds_on_live_pool(pool: sqlx::PgPool) {
    health_check(&pool).await.expect("health_check failed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn inserted_records_round_trip_through_normalization(pool: sqlx::PgPool) {
    let records = vec![
        record(1, "Bombay Canteen", "Mumbai", 4.5, 500.0),
        record(2, "Indian Accent", "Delhi", 4.8, 1200.0),
    ];

    let written = insert_restaurants(&pool, &records)
        .await
        .expect("insert_restaurants failed");
    assert_eq!(written, 2);

    let rows = fetch_restaurant_rows(&pool)
        .await
        .expect("fetch_restaurant_rows failed");
    let (loaded, stats) = normalize(rows);

    assert_eq!(stats.kept, 2);
    assert_eq!(loaded, records);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_is_idempotent_by_id(pool: sqlx::PgPool) {
    insert_restaurants(&pool, &[record(7, "Old Name", "Pune", 3.0, 300.0)])
        .await
        .expect("first insert failed");
    insert_restaurants(&pool, &[record(7, "New Name", "Pune", 3.5, 300.0)])
        .await
        .expect("second insert failed");

    assert_eq!(count_restaurants(&pool).await.expect("count failed"), 1);
    let (loaded, _) = normalize(fetch_restaurant_rows(&pool).await.expect("fetch failed"));
    assert_eq!(loaded[0].name, "New Name");
}

#[sqlx::test(migrations = "../../migrations")]
async fn rows_with_null_rating_are_dropped_on_load(pool: sqlx::PgPool) {
    sqlx::query("INSERT INTO restaurants (name, rating, city, cost) VALUES ('No Rating', NULL, 'Pune', 200)")
        .execute(&pool)
        .await
        .expect("raw insert failed");
    insert_restaurants(&pool, &[record(50, "Rated", "Pune", 4.0, 200.0)])
        .await
        .expect("insert failed");

    let (loaded, stats) = normalize(fetch_restaurant_rows(&pool).await.expect("fetch failed"));
    assert_eq!(stats.total_rows, 2);
    assert_eq!(stats.dropped_rating, 1);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Rated");
}

#[sqlx::test(migrations = "../../migrations")]
async fn sequence_advances_past_seeded_ids(pool: sqlx::PgPool) {
    insert_restaurants(&pool, &[record(100, "Seeded", "Delhi", 4.0, 400.0)])
        .await
        .expect("insert failed");

    let next_id: i64 = sqlx::query_scalar(
        "INSERT INTO restaurants (name, rating, city, cost) VALUES ('Later', 4.1, 'Delhi', 300) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .expect("insert without id failed");

    assert!(next_id > 100, "expected id past 100, got {next_id}");
}
