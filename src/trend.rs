//! Trend estimation over raw weight observations
//!
//! Day-to-day scale weight is noisy (water, glycogen, meal timing); the
//! trend estimator converts the raw observation sequence into a smoothed
//! value per date so the trajectory layer can work with genuine change.
//! Three strategies are supported; `MeanPerWeek` is the documented default.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default EMA smoothing constant (~7-observation half-life)
pub const DEFAULT_EMA_ALPHA: f64 = 0.1;

/// Default rolling-median window, in observations
pub const DEFAULT_MEDIAN_WINDOW: usize = 7;

/// ---------------------------------------------------------------------------
/// ISO Week Helpers
/// ---------------------------------------------------------------------------

/// ISO-8601 week identifier, e.g. "2024-W01". Monday-start weeks; week 1 is
/// the week containing the year's first Thursday.
pub fn iso_week_id(date: NaiveDate) -> String {
  let iso = date.iso_week();
  format!("{}-W{:02}", iso.year(), iso.week())
}

/// The Monday of the ISO week containing `date`
pub fn iso_week_start(date: NaiveDate) -> NaiveDate {
  let iso = date.iso_week();
  NaiveDate::from_isoywd_opt(iso.year(), iso.week(), Weekday::Mon).unwrap_or(date)
}

/// ---------------------------------------------------------------------------
/// Smoothing Strategy
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrendStrategy {
  /// Arithmetic mean per ISO week, assigned uniformly to member dates
  MeanPerWeek,
  /// Exponential moving average, seeded at the first observation
  Ema { alpha: f64 },
  /// Median of the most recent `window` observations, inclusive
  RollingMedian { window: usize },
}

impl Default for TrendStrategy {
  fn default() -> Self {
    TrendStrategy::MeanPerWeek
  }
}

/// One smoothed observation, aligned to its measurement date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
  pub date: NaiveDate,
  pub weight: f64,
  pub trend: f64,
}

impl TrendStrategy {
  /// Compute one trend point per observation.
  ///
  /// `observations` must be strictly increasing by date with no duplicates;
  /// the engine entry point sorts and the storage layer's unique index on
  /// date guarantees no duplicates reach this function. Calendar gaps of
  /// any length are fine: EMA and the median window step over missing days,
  /// and sparse weeks simply have fewer members.
  pub fn compute(&self, observations: &[(NaiveDate, f64)]) -> Vec<TrendPoint> {
    match self {
      TrendStrategy::MeanPerWeek => Self::mean_per_week(observations),
      TrendStrategy::Ema { alpha } => Self::ema(observations, *alpha),
      TrendStrategy::RollingMedian { window } => Self::rolling_median(observations, *window),
    }
  }

  /// A week's representative trend value from its members' trend values
  pub fn week_value(&self, member_trends: &[f64]) -> f64 {
    match self {
      TrendStrategy::RollingMedian { .. } => {
        let mut sorted = member_trends.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        median_of_sorted(&sorted)
      }
      _ => mean(member_trends),
    }
  }

  fn mean_per_week(observations: &[(NaiveDate, f64)]) -> Vec<TrendPoint> {
    let mut weeks: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (date, weight) in observations {
      let entry = weeks.entry(iso_week_start(*date)).or_insert((0.0, 0));
      entry.0 += weight;
      entry.1 += 1;
    }

    observations
      .iter()
      .map(|(date, weight)| {
        let (sum, count) = weeks[&iso_week_start(*date)];
        TrendPoint {
          date: *date,
          weight: *weight,
          trend: sum / count as f64,
        }
      })
      .collect()
  }

  /// Strictly sequential over the full sorted history: each value depends
  /// on everything before it, so this cannot be computed on a subrange.
  fn ema(observations: &[(NaiveDate, f64)], alpha: f64) -> Vec<TrendPoint> {
    let mut out = Vec::with_capacity(observations.len());
    let mut trend = match observations.first() {
      Some((_, weight)) => *weight,
      None => return out,
    };

    for (i, (date, weight)) in observations.iter().enumerate() {
      if i > 0 {
        trend += alpha * (weight - trend);
      }
      out.push(TrendPoint {
        date: *date,
        weight: *weight,
        trend,
      });
    }

    out
  }

  fn rolling_median(observations: &[(NaiveDate, f64)], window: usize) -> Vec<TrendPoint> {
    let window = window.max(1);

    observations
      .iter()
      .enumerate()
      .map(|(i, (date, weight))| {
        // Observation-count window, not calendar-time: short prefixes use
        // all available points.
        let start = (i + 1).saturating_sub(window);
        let mut recent: Vec<f64> = observations[start..=i].iter().map(|(_, w)| *w).collect();
        recent.sort_by(|a, b| a.total_cmp(b));

        TrendPoint {
          date: *date,
          weight: *weight,
          trend: median_of_sorted(&recent),
        }
      })
      .collect()
  }
}

fn mean(values: &[f64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  values.iter().sum::<f64>() / values.len() as f64
}

fn median_of_sorted(values: &[f64]) -> f64 {
  let n = values.len();
  if n == 0 {
    return 0.0;
  }
  if n % 2 == 1 {
    values[n / 2]
  } else {
    (values[n / 2 - 1] + values[n / 2]) / 2.0
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
