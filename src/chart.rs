//! Chart data assembly
//!
//! Maps the trend and target series into per-day renderable points. Gap
//! rendering is the chart's job; this layer only marks missing data with
//! explicit `None` and supplies the target band bounds.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::trajectory::WeeklySummary;
use crate::trend::{iso_week_start, TrendPoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyChartPoint {
  pub date: NaiveDate,
  /// Raw measured weight, None on days without an observation
  pub actual: Option<f64>,
  /// Smoothed trend value, None on days without an observation
  pub trend: Option<f64>,
  pub target: f64,
  pub target_upper: f64,
  pub target_lower: f64,
}

/// Build per-day points spanning the observed date range.
///
/// A day's target interpolates linearly across its ISO week, from the
/// week's start-of-week target (`week_target - rate`) to its end-of-week
/// target, day fraction `(weekday_index + 1) / 7` with Monday = 0. The
/// interpolation is cosmetic and never feeds back into the weekly fold.
/// Days in ISO weeks with zero entries have no weekly target and emit no
/// point; the chart renders those spans as gaps.
pub fn assemble_daily_points(
  points: &[TrendPoint],
  summaries: &[WeeklySummary],
  weekly_rate: f64,
  tolerance: f64,
) -> Vec<DailyChartPoint> {
  let (first, last) = match (points.first(), points.last()) {
    (Some(first), Some(last)) => (first.date, last.date),
    _ => return Vec::new(),
  };

  let by_date: BTreeMap<NaiveDate, &TrendPoint> = points.iter().map(|p| (p.date, p)).collect();
  let by_week: BTreeMap<NaiveDate, &WeeklySummary> =
    summaries.iter().map(|s| (s.week_start, s)).collect();

  let mut out = Vec::new();
  let mut day = first;

  while day <= last {
    if let Some(summary) = by_week.get(&iso_week_start(day)) {
      let fraction = (day.weekday().num_days_from_monday() as f64 + 1.0) / 7.0;
      let week_start_target = summary.target - weekly_rate;
      let target = week_start_target + weekly_rate * fraction;

      let observation = by_date.get(&day);

      out.push(DailyChartPoint {
        date: day,
        actual: observation.map(|p| p.weight),
        trend: observation.map(|p| p.trend),
        target,
        target_upper: target + tolerance,
        target_lower: target - tolerance,
      });
    }

    day = day + Duration::days(1);
  }

  out
}

/// Date-range filter for the chart's visible window
pub fn filter_date_range(
  points: &[DailyChartPoint],
  from: Option<NaiveDate>,
  to: Option<NaiveDate>,
) -> Vec<DailyChartPoint> {
  points
    .iter()
    .filter(|p| from.map_or(true, |f| p.date >= f) && to.map_or(true, |t| p.date <= t))
    .cloned()
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
