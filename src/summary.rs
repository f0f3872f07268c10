//! Per-interval aggregation and the human-readable formats used in reports.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MIN_DISTANCE_KM;
use crate::intervals::{IntervalLabel, IntervalTotals};
use crate::refine::RefinedIntervals;
use crate::track::Fix;

/// Placeholder for any value that cannot be reported.
pub const NOT_AVAILABLE: &str = "N/A";

/// Plausible pace ceiling in min/km; slower values are not reported.
const MAX_REPORTABLE_PACE: f64 = 100.0;

/// Aggregated figures for one final interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub id: u32,
    pub label: IntervalLabel,
    /// First fix index (inclusive)
    pub start: usize,
    /// Last fix index (exclusive)
    pub end: usize,
    pub totals: IntervalTotals,
    /// Mean heart rate over fixes that have one
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub is_real: bool,
}

impl IntervalSummary {
    /// Total distance in meters, rounded to the nearest 100 m.
    pub fn total_distance_m(&self) -> i64 {
        round_distance_m(self.totals.distance_km)
    }

    pub fn formatted_time(&self) -> String {
        format_time(self.totals.time_seconds)
    }

    pub fn formatted_pace(&self, min_distance_km: f64) -> String {
        format_pace_with_floor(
            self.totals.time_seconds,
            self.totals.distance_km,
            min_distance_km,
        )
    }
}

/// Mean and max heart rate over the fixes that carry one.
///
/// Both are `None` when no fix has a heart rate.
pub fn heart_rate_stats(fixes: &[Fix]) -> (Option<f64>, Option<f64>) {
    let (sum, count, max) = fixes
        .iter()
        .filter_map(|f| f.heart_rate)
        .fold((0.0, 0usize, f64::NEG_INFINITY), |(sum, count, max), hr| {
            (sum + hr, count + 1, max.max(hr))
        });

    if count == 0 {
        (None, None)
    } else {
        (Some(sum / count as f64), Some(max))
    }
}

/// Summarize every final interval, in id order.
pub fn summarize(fixes: &[Fix], refined: &RefinedIntervals) -> Vec<IntervalSummary> {
    let summaries: Vec<IntervalSummary> = refined
        .spans
        .iter()
        .zip(&refined.totals)
        .zip(&refined.is_real)
        .map(|((span, totals), &is_real)| {
            let (avg_heart_rate, max_heart_rate) = heart_rate_stats(&fixes[span.range()]);
            IntervalSummary {
                id: span.id,
                label: span.label,
                start: span.start,
                end: span.end,
                totals: *totals,
                avg_heart_rate,
                max_heart_rate,
                is_real,
            }
        })
        .collect();

    debug!(
        "[Summary] {} intervals summarized, {} steady",
        summaries.len(),
        summaries
            .iter()
            .filter(|s| s.label == IntervalLabel::Steady)
            .count()
    );

    summaries
}

/// Round a distance in km to whole meters at 100 m resolution. Halves go to even.
pub fn round_distance_m(distance_km: f64) -> i64 {
    ((distance_km * 1000.0) / 100.0).round_ties_even() as i64 * 100
}

/// `HH:MM:SS`, or "N/A" for an undefined or negative duration.
///
/// # Example
/// ```
/// use workout_intervals::summary::format_time;
///
/// assert_eq!(format_time(3725.9), "01:02:05");
/// assert_eq!(format_time(-1.0), "N/A");
/// ```
pub fn format_time(total_seconds: f64) -> String {
    if total_seconds.is_nan() || total_seconds < 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    let total = total_seconds as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// `MM:SS` per km with the default distance floor.
///
/// # Example
/// ```
/// use workout_intervals::summary::format_pace;
///
/// assert_eq!(format_pace(300.0, 1.0), "05:00");
/// assert_eq!(format_pace(30.0, 0.01), "N/A");
/// ```
pub fn format_pace(total_seconds: f64, total_distance_km: f64) -> String {
    format_pace_with_floor(total_seconds, total_distance_km, DEFAULT_MIN_DISTANCE_KM)
}

/// `MM:SS` per km, or "N/A" when the distance is at or below `min_distance_km`
/// or the pace falls outside (0, 100] min/km.
pub fn format_pace_with_floor(
    total_seconds: f64,
    total_distance_km: f64,
    min_distance_km: f64,
) -> String {
    if total_distance_km.is_nan() || total_distance_km <= min_distance_km {
        return NOT_AVAILABLE.to_string();
    }

    let pace = (total_seconds / 60.0) / total_distance_km;
    if pace.is_nan() || pace <= 0.0 || pace > MAX_REPORTABLE_PACE {
        return NOT_AVAILABLE.to_string();
    }

    let mut minutes = pace.trunc() as u32;
    let mut seconds = ((pace - pace.trunc()) * 60.0).round_ties_even() as u32;
    if seconds >= 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{:02}:{:02}", minutes, seconds)
}
