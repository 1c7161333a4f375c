//! Target trajectory propagation with tolerance tunnel and snap-back
//!
//! Weekly trend values are folded left-to-right into a target line driven
//! by the configured weekly rate. While the trend stays inside the
//! tolerance tunnel the ideal line continues unchanged; once it breaches,
//! the next week's target re-anchors to the actual trend instead of
//! forcing a catch-up to the original line. A plateau therefore shifts the
//! target permanently rather than demanding unrealistic compensation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::trend::{iso_week_id, iso_week_start, TrendPoint, TrendStrategy};

/// Tolerance tunnel half-width in kg around each week's target
pub const DEFAULT_TOLERANCE_KG: f64 = 0.25;

/// ---------------------------------------------------------------------------
/// Weekly Aggregation
/// ---------------------------------------------------------------------------

/// One ISO week's worth of observations, before target propagation.
/// Weeks with zero observations are skipped, not zero-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekAggregate {
  pub week_id: String,
  pub week_start: NaiveDate,
  pub trend_value: f64,
  pub raw_average: f64,
  pub entry_count: usize,
}

/// Group trend points into per-week aggregates, ascending by week.
pub fn aggregate_weeks(points: &[TrendPoint], strategy: &TrendStrategy) -> Vec<WeekAggregate> {
  let mut weeks: BTreeMap<NaiveDate, Vec<&TrendPoint>> = BTreeMap::new();
  for point in points {
    weeks.entry(iso_week_start(point.date)).or_default().push(point);
  }

  weeks
    .into_iter()
    .map(|(week_start, members)| {
      let trends: Vec<f64> = members.iter().map(|p| p.trend).collect();
      let raw_sum: f64 = members.iter().map(|p| p.weight).sum();

      WeekAggregate {
        week_id: iso_week_id(week_start),
        week_start,
        trend_value: strategy.week_value(&trends),
        raw_average: raw_sum / members.len() as f64,
        entry_count: members.len(),
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Target Propagation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
  pub week_id: String,
  pub week_start: NaiveDate,
  pub trend_value: f64,
  pub raw_average: f64,
  pub entry_count: usize,
  pub target: f64,
  pub delta: f64,
  pub has_prev: bool,
  pub in_tunnel: bool,
}

/// Fold weekly aggregates into the target trajectory.
///
/// Week 0 is self-anchored: its target equals its own trend value. For
/// every later week the branch depends on how far last week's trend sat
/// from last week's target:
/// - within tolerance: `target = prev_target + rate`, the ideal line
///   continues without drift correction;
/// - beyond tolerance: `target = prev_trend + rate`, the trajectory
///   re-anchors to where the trend actually is (snap-back).
///
/// The comparison uses the trend value, never the raw average.
pub fn propagate(weeks: &[WeekAggregate], weekly_rate: f64, tolerance: f64) -> Vec<WeeklySummary> {
  let mut out: Vec<WeeklySummary> = Vec::with_capacity(weeks.len());

  for (i, week) in weeks.iter().enumerate() {
    let (target, delta, has_prev) = if i == 0 {
      (week.trend_value, 0.0, false)
    } else {
      let prev = &weeks[i - 1];
      let prev_target = out[i - 1].target;
      let distance = (prev.trend_value - prev_target).abs();

      let target = if distance <= tolerance {
        prev_target + weekly_rate
      } else {
        prev.trend_value + weekly_rate
      };

      (target, week.trend_value - prev.trend_value, true)
    };

    out.push(WeeklySummary {
      week_id: week.week_id.clone(),
      week_start: week.week_start,
      trend_value: week.trend_value,
      raw_average: week.raw_average,
      entry_count: week.entry_count,
      target,
      delta,
      has_prev,
      in_tunnel: (week.trend_value - target).abs() <= tolerance,
    });
  }

  out
}

/// ---------------------------------------------------------------------------
/// Current Rate (7-Day Lookback)
/// ---------------------------------------------------------------------------

/// Instantaneous velocity: latest trend minus the trend at the most recent
/// observation dated at least 7 calendar days earlier. A finite difference,
/// not an average of daily deltas. When no observation is old enough the
/// lookback falls back to the oldest available point; with fewer than two
/// observations there is no rate.
pub fn current_trend_rate(points: &[TrendPoint]) -> Option<f64> {
  if points.len() < 2 {
    return None;
  }

  let latest = points.last()?;
  let cutoff = latest.date - chrono::Duration::days(7);

  let anchor = points[..points.len() - 1]
    .iter()
    .rev()
    .find(|p| p.date <= cutoff)
    .unwrap_or(&points[0]);

  Some(latest.trend - anchor.trend)
}

/// ---------------------------------------------------------------------------
/// Adherence Classifier
/// ---------------------------------------------------------------------------

/// Deviation magnitude thresholds in kg/week
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdherenceThresholds {
  pub on_pace_kg: f64,
  pub mild_kg: f64,
}

impl Default for AdherenceThresholds {
  fn default() -> Self {
    Self {
      on_pace_kg: 0.1,
      mild_kg: 0.25,
    }
  }
}

/// Three-way bucket over `|actual_delta - target_rate|`. Stateless, no
/// hysteresis; recomputed independently each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceBand {
  OnPace,
  MildDeviation,
  SignificantDeviation,
}

impl AdherenceBand {
  pub fn classify(actual_delta: f64, target_rate: f64, thresholds: &AdherenceThresholds) -> Self {
    let deviation = (actual_delta - target_rate).abs();

    if deviation <= thresholds.on_pace_kg {
      AdherenceBand::OnPace
    } else if deviation <= thresholds.mild_kg {
      AdherenceBand::MildDeviation
    } else {
      AdherenceBand::SignificantDeviation
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      AdherenceBand::OnPace => "on_pace",
      AdherenceBand::MildDeviation => "mild_deviation",
      AdherenceBand::SignificantDeviation => "significant_deviation",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
