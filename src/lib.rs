mod chart;
mod commands;
mod db;
mod engine;
mod models;
mod trajectory;
mod trend;

#[cfg(test)]
pub mod test_utils;

use db::AppState;
use std::sync::Arc;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      // Initialize database
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState { db: pool });
            app_handle.manage(state);
            println!("Database ready");
          }
          Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::get_weights,
      // Weight entry commands
      commands::weights::log_weight,
      commands::weights::delete_weight,
      // Plan settings commands
      commands::settings::get_plan_settings,
      commands::settings::save_plan_settings,
      // Dashboard command
      commands::dashboard::get_dashboard,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
