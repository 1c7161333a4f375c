use crate::db::{AppState, StoreError};
use crate::models::PlanSettings;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Plan Settings Commands
/// ---------------------------------------------------------------------------

/// None until the user saves a plan for the first time; the frontend
/// routes to the configuration screen in that case.
#[tauri::command]
pub async fn get_plan_settings(
  state: State<'_, Arc<AppState>>,
) -> Result<Option<PlanSettings>, String> {
  sqlx::query_as::<_, PlanSettings>(
    "SELECT weekly_rate, updated_at FROM plan_settings WHERE id = 1",
  )
  .fetch_optional(&state.db)
  .await
  .map_err(|e| format!("Failed to get settings: {}", e))
}

/// Save the plan. Full overwrite of the singleton row.
#[tauri::command]
pub async fn save_plan_settings(
  state: State<'_, Arc<AppState>>,
  weekly_rate: f64,
) -> Result<PlanSettings, StoreError> {
  if !weekly_rate.is_finite() {
    return Err(StoreError::InvalidRate(weekly_rate));
  }

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
  .execute(&state.db)
  .await?;

  let settings = sqlx::query_as::<_, PlanSettings>(
    "SELECT weekly_rate, updated_at FROM plan_settings WHERE id = 1",
  )
  .fetch_one(&state.db)
  .await?;

  Ok(settings)
}
