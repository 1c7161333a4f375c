use crate::chart::filter_date_range;
use crate::db::AppState;
use crate::engine::{compute_dashboard, DashboardData, EngineConfig};
use crate::models::{PlanSettings, WeightEntry};
use chrono::NaiveDate;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Dashboard Command
/// ---------------------------------------------------------------------------

/// Load the current snapshot and re-derive every series from scratch. The
/// engine itself is pure; this command is the only place it meets I/O.
/// `from`/`to` narrow the chart's visible window without affecting the
/// weekly computation.
#[tauri::command]
pub async fn get_dashboard(
  state: State<'_, Arc<AppState>>,
  from: Option<NaiveDate>,
  to: Option<NaiveDate>,
) -> Result<DashboardData, String> {
  let entries = sqlx::query_as::<_, WeightEntry>(
    "SELECT id, weight, date, created_at FROM weights ORDER BY date ASC",
  )
  .fetch_all(&state.db)
  .await
  .map_err(|e| format!("Failed to fetch weights: {}", e))?;

  let settings = sqlx::query_as::<_, PlanSettings>(
    "SELECT weekly_rate, updated_at FROM plan_settings WHERE id = 1",
  )
  .fetch_optional(&state.db)
  .await
  .map_err(|e| format!("Failed to fetch settings: {}", e))?;

  let mut data = compute_dashboard(&entries, settings.as_ref(), &EngineConfig::default());
  if from.is_some() || to.is_some() {
    data.chart_points = filter_date_range(&data.chart_points, from, to);
  }

  Ok(data)
}
