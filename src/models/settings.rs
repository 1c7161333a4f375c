use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton plan configuration (row id 1). Saves fully overwrite. While
/// no row exists the engine must not run; the frontend shows the
/// configuration screen instead.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanSettings {
  /// Signed kg/week: positive = gaining goal, negative = losing goal,
  /// zero = maintenance
  pub weekly_rate: f64,
  /// Advisory write timestamp
  pub updated_at: Option<DateTime<Utc>>,
}
