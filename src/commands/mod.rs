pub mod dashboard;
pub mod settings;
pub mod weights;

use crate::db::AppState;
use crate::models::WeightEntry;
use std::sync::Arc;
use tauri::State;

/// Newest-first listing for the entry table
#[tauri::command]
pub async fn get_weights(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<WeightEntry>, String> {
  sqlx::query_as::<_, WeightEntry>(
    "SELECT id, weight, date, created_at FROM weights ORDER BY date DESC"
  )
  .fetch_all(&state.db)
  .await
  .map_err(|e| format!("Failed to fetch weights: {}", e))
}
