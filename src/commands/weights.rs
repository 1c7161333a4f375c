use crate::db::{AppState, StoreError};
use crate::models::WeightEntry;
use chrono::NaiveDate;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Weight Entry Commands
/// ---------------------------------------------------------------------------

/// Log a measurement. One entry per day: logging the same date again
/// overwrites the earlier row. Returns the stored entry.
#[tauri::command]
pub async fn log_weight(
  state: State<'_, Arc<AppState>>,
  weight: f64,
  date: NaiveDate,
) -> Result<WeightEntry, StoreError> {
  // The engine assumes validated finite numbers; sanitize here.
  if !weight.is_finite() || weight <= 0.0 {
    return Err(StoreError::InvalidWeight(weight));
  }

  sqlx::query(
    r#"
    INSERT INTO weights (date, weight)
    VALUES (?1, ?2)
    ON CONFLICT(date) DO UPDATE SET
      weight = excluded.weight,
      created_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(date)
  .bind(weight)
  .execute(&state.db)
  .await?;

  let entry = sqlx::query_as::<_, WeightEntry>(
    "SELECT id, weight, date, created_at FROM weights WHERE date = ?1",
  )
  .bind(date)
  .fetch_one(&state.db)
  .await?;

  Ok(entry)
}

/// Delete an entry by id. Deleting an unknown id is a no-op.
#[tauri::command]
pub async fn delete_weight(
  state: State<'_, Arc<AppState>>,
  id: i64,
) -> Result<(), StoreError> {
  sqlx::query("DELETE FROM weights WHERE id = ?1")
    .bind(id)
    .execute(&state.db)
    .await?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use serial_test::serial;
  use tauri::Manager;

  #[tokio::test]
  #[serial]
  async fn test_log_weight_inserts_entry() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let entry = log_weight(app.state(), 80.5, test_date("2024-01-01"))
      .await
      .expect("insert succeeds");

    assert_eq!(entry.weight, 80.5);
    assert_eq!(entry.date, test_date("2024-01-01"));
    assert!(entry.created_at.is_some());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_log_weight_same_date_overwrites() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let first = log_weight(app.state(), 80.5, test_date("2024-01-01"))
      .await
      .expect("first insert");
    let second = log_weight(app.state(), 81.0, test_date("2024-01-01"))
      .await
      .expect("overwrite");

    assert_eq!(first.id, second.id);
    assert_eq!(second.weight, 81.0);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weights")
      .fetch_one(&pool)
      .await
      .expect("count query");
    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_log_weight_rejects_invalid_values() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    assert!(log_weight(app.state(), 0.0, test_date("2024-01-01")).await.is_err());
    assert!(log_weight(app.state(), -5.0, test_date("2024-01-01")).await.is_err());
    assert!(log_weight(app.state(), f64::NAN, test_date("2024-01-01")).await.is_err());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_delete_weight_removes_entry() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let entry = log_weight(app.state(), 80.5, test_date("2024-01-01"))
      .await
      .expect("insert");
    delete_weight(app.state(), entry.id).await.expect("delete");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weights")
      .fetch_one(&pool)
      .await
      .expect("count query");
    assert_eq!(count, 0);

    // Unknown id is a no-op
    delete_weight(app.state(), 9999).await.expect("no-op delete");

    teardown_test_db(pool).await;
  }
}
