use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged measurement. Dates are unique; writing the same date again
/// overwrites the earlier row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeightEntry {
  pub id: i64,
  /// Kilograms, validated finite and positive at the command boundary
  pub weight: f64,
  pub date: NaiveDate,
  /// Advisory write timestamp, never used in calculations
  pub created_at: Option<DateTime<Utc>>,
}
