//! Engine entry point
//!
//! The whole derivation is one pure function over the current snapshot of
//! entries and settings. It re-runs from scratch on every change; nothing
//! is cached or incrementally updated, which is fine at a few thousand
//! points.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::chart::{assemble_daily_points, DailyChartPoint};
use crate::models::{PlanSettings, WeightEntry};
use crate::trajectory::{
  aggregate_weeks, current_trend_rate, propagate, AdherenceBand, AdherenceThresholds,
  WeeklySummary, DEFAULT_TOLERANCE_KG,
};
use crate::trend::TrendStrategy;

/// Engine constants, passed explicitly so tests can vary them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
  pub strategy: TrendStrategy,
  pub tolerance: f64,
  pub thresholds: AdherenceThresholds,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      strategy: TrendStrategy::default(),
      tolerance: DEFAULT_TOLERANCE_KG,
      thresholds: AdherenceThresholds::default(),
    }
  }
}

/// Everything the dashboard renders, derived per call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
  pub weekly_summaries: Vec<WeeklySummary>,
  /// Signed kg/week, 7-day-lookback finite difference over the trend
  pub current_trend_rate: Option<f64>,
  /// Classification of the latest week's realized delta against the plan
  pub adherence: Option<AdherenceBand>,
  pub chart_points: Vec<DailyChartPoint>,
}

/// Derive the full dashboard series from a snapshot of entries and settings.
///
/// Absent settings means "do not compute a trajectory yet": the result is
/// empty and the caller routes the user to configuration. Empty histories
/// are equally quiescent. Entries may arrive in any order; they are sorted
/// here. Weights are assumed validated (finite, positive) and dates unique,
/// both enforced at the command/storage boundary.
pub fn compute_dashboard(
  entries: &[WeightEntry],
  settings: Option<&PlanSettings>,
  config: &EngineConfig,
) -> DashboardData {
  let settings = match settings {
    Some(settings) => settings,
    None => return DashboardData::default(),
  };
  if entries.is_empty() {
    return DashboardData::default();
  }

  let mut observations: Vec<(NaiveDate, f64)> =
    entries.iter().map(|e| (e.date, e.weight)).collect();
  observations.sort_by_key(|(date, _)| *date);

  let points = config.strategy.compute(&observations);
  let weeks = aggregate_weeks(&points, &config.strategy);
  let weekly_summaries = propagate(&weeks, settings.weekly_rate, config.tolerance);

  let current_trend_rate = current_trend_rate(&points);
  let adherence = weekly_summaries
    .last()
    .filter(|week| week.has_prev)
    .map(|week| AdherenceBand::classify(week.delta, settings.weekly_rate, &config.thresholds));

  let chart_points = assemble_daily_points(
    &points,
    &weekly_summaries,
    settings.weekly_rate,
    config.tolerance,
  );

  DashboardData {
    weekly_summaries,
    current_trend_rate,
    adherence,
    chart_points,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
