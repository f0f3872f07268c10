//! Output records: the interval table and the per-fix pace series.
//!
//! Interval records use the display column names consumers chart and tabulate
//! directly ("Total Time", "Average Pace (min/km)", ...). Unavailable values are
//! the string "N/A" rather than null.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::intervals::IntervalLabel;
use crate::smoothing::PaceSeries;
use crate::summary::{IntervalSummary, NOT_AVAILABLE};
use crate::track::Fix;

/// A heart-rate figure: whole beats per minute, or not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bpm {
    Value(i64),
    NotAvailable,
}

impl Bpm {
    /// Round to whole bpm, halves to even.
    pub fn from_rate(rate: Option<f64>) -> Self {
        match rate {
            Some(r) if r.is_finite() => Bpm::Value(r.round_ties_even() as i64),
            _ => Bpm::NotAvailable,
        }
    }
}

impl Serialize for Bpm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Bpm::Value(v) => serializer.serialize_i64(*v),
            Bpm::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// One row of the interval table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRecord {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Type")]
    pub interval_type: IntervalLabel,
    #[serde(rename = "Total Distance (m)")]
    pub total_distance_m: i64,
    #[serde(rename = "Total Time")]
    pub total_time: String,
    #[serde(rename = "Average Pace (min/km)")]
    pub average_pace: String,
    #[serde(rename = "Average Heart Rate (BPM)")]
    pub average_heart_rate: Bpm,
    #[serde(rename = "Max Heart Rate (BPM)")]
    pub max_heart_rate: Bpm,
    pub is_real_interval: bool,
    /// Total time of the following interval
    #[serde(rename = "Recovery Time")]
    pub recovery_time: String,
}

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceRecord {
    pub time: Option<DateTime<Utc>>,
    pub time_since_start_seconds: Option<f64>,
    pub pace_min_per_km: Option<f64>,
    pub interval_type: IntervalLabel,
    pub pace_lma_min_per_km: Option<f64>,
}

/// Both output collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Steady intervals only
    pub summary_data: Vec<IntervalRecord>,
    /// One record per input fix, unfiltered
    pub pace_data: Vec<PaceRecord>,
}

impl AnalysisReport {
    /// Encode as `{"summaryData": [...], "paceData": [...]}`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build records for every interval; each carries the next interval's time
/// as its recovery time.
pub fn interval_records(summaries: &[IntervalSummary], config: &AnalysisConfig) -> Vec<IntervalRecord> {
    summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let (average_heart_rate, max_heart_rate) = match summary.avg_heart_rate {
                Some(_) => (
                    Bpm::from_rate(summary.avg_heart_rate),
                    Bpm::from_rate(summary.max_heart_rate),
                ),
                None => (Bpm::NotAvailable, Bpm::NotAvailable),
            };

            IntervalRecord {
                id: summary.id,
                interval_type: summary.label,
                total_distance_m: summary.total_distance_m(),
                total_time: summary.formatted_time(),
                average_pace: summary.formatted_pace(config.min_distance_km),
                average_heart_rate,
                max_heart_rate,
                is_real_interval: summary.is_real,
                recovery_time: summaries
                    .get(i + 1)
                    .map(|next| next.formatted_time())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            }
        })
        .collect()
}

/// Build the per-fix pace series. Elapsed time counts from the first fix that
/// has a timestamp.
pub fn pace_records(fixes: &[Fix], pace: &PaceSeries, labels: &[IntervalLabel]) -> Vec<PaceRecord> {
    let start = fixes.iter().find_map(|f| f.time);

    fixes
        .iter()
        .enumerate()
        .map(|(i, fix)| PaceRecord {
            time: fix.time,
            time_since_start_seconds: match (fix.time, start) {
                (Some(t), Some(t0)) => Some((t - t0).num_milliseconds() as f64 / 1000.0),
                _ => None,
            },
            pace_min_per_km: pace.pace_min_per_km.get(i).copied().flatten(),
            interval_type: labels.get(i).copied().unwrap_or(IntervalLabel::Recovery),
            pace_lma_min_per_km: pace.pace_lma_min_per_km.get(i).copied().flatten(),
        })
        .collect()
}
