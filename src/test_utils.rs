//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::models::{PlanSettings, WeightEntry};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the database with weight entries, given as (date, kg) pairs.
/// Returns the IDs of created rows.
pub async fn seed_test_weights(pool: &SqlitePool, entries: &[(&str, f64)]) -> Vec<i64> {
  let mut ids = Vec::new();

  for (date, weight) in entries {
    let result = sqlx::query(
      r#"
      INSERT INTO weights (date, weight)
      VALUES (?1, ?2)
      ON CONFLICT(date) DO UPDATE SET
        weight = excluded.weight,
        created_at = CURRENT_TIMESTAMP
      "#,
    )
    .bind(test_date(date))
    .bind(weight)
    .execute(pool)
    .await
    .expect("Failed to insert test weight");

    ids.push(result.last_insert_rowid());
  }

  ids
}

/// Seed the singleton plan settings row
pub async fn seed_test_plan_settings(pool: &SqlitePool, weekly_rate: f64) -> PlanSettings {
  sqlx::query(
    r#"
    INSERT INTO plan_settings (id, weekly_rate, updated_at)
    VALUES (1, ?1, CURRENT_TIMESTAMP)
    ON CONFLICT(id) DO UPDATE SET
      weekly_rate = excluded.weekly_rate,
      updated_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(weekly_rate)
  .execute(pool)
  .await
  .expect("Failed to seed plan settings");

  PlanSettings {
    weekly_rate,
    updated_at: Some(Utc::now()),
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Parse a YYYY-MM-DD test literal
pub fn test_date(s: &str) -> NaiveDate {
  s.parse().expect("valid test date")
}

/// Create a mock weight entry without touching the database
pub fn mock_entry(id: i64, date: &str, weight: f64) -> WeightEntry {
  WeightEntry {
    id,
    weight,
    date: test_date(date),
    created_at: Some(Utc::now()),
  }
}

/// Create mock plan settings for engine tests
pub fn mock_settings(weekly_rate: f64) -> PlanSettings {
  PlanSettings {
    weekly_rate,
    updated_at: Some(Utc::now()),
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('weights', 'plan_settings')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_weights_returns_correct_count() {
    let pool = setup_test_db().await;

    let ids = seed_test_weights(&pool, &[("2024-01-01", 80.0), ("2024-01-02", 80.2)]).await;
    assert_eq!(ids.len(), 2);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weights")
      .fetch_one(&pool)
      .await
      .expect("Failed to count weights");

    assert_eq!(count, 2);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let entry = mock_entry(1, "2024-01-01", 80.5);
    assert_eq!(entry.id, 1);
    assert_eq!(entry.weight, 80.5);
    assert_eq!(entry.date, test_date("2024-01-01"));

    let settings = mock_settings(-0.5);
    assert_eq!(settings.weekly_rate, -0.5);
    assert!(settings.updated_at.is_some());
  }
}
