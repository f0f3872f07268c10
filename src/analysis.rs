//! Pipeline orchestration.
//!
//! One track in, one analysis out. Each call is independent, so batches of
//! tracks can be spread across threads with the `parallel` feature.

use log::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classify::classify;
use crate::config::{AnalysisConfig, AnalysisParams};
use crate::error::Result;
use crate::intervals::IntervalLabel;
use crate::refine::{refine, RefinedIntervals};
use crate::report::{interval_records, pace_records, AnalysisReport};
use crate::segments::{derive_segments, Segment};
use crate::smoothing::{smooth_pace, PaceSeries};
use crate::summary::{summarize, IntervalSummary};
use crate::track::{parse_track_json, Fix};

/// Every intermediate of one track's analysis.
#[derive(Debug, Clone)]
pub struct TrackAnalysis {
    pub fixes: Vec<Fix>,
    pub segments: Vec<Segment>,
    pub pace: PaceSeries,
    /// Classifier output before refinement
    pub provisional_labels: Vec<IntervalLabel>,
    pub refined: RefinedIntervals,
    /// All final intervals, Steady and Recovery
    pub summaries: Vec<IntervalSummary>,
    pub config: AnalysisConfig,
}

impl TrackAnalysis {
    /// Steady intervals plus the full pace series.
    pub fn report(&self) -> AnalysisReport {
        let summary_data = interval_records(&self.summaries, &self.config)
            .into_iter()
            .filter(|r| r.interval_type == IntervalLabel::Steady)
            .collect();

        AnalysisReport {
            summary_data,
            pace_data: pace_records(&self.fixes, &self.pace, &self.refined.labels),
        }
    }

    /// Final Steady intervals.
    pub fn steady_intervals(&self) -> impl Iterator<Item = &IntervalSummary> {
        self.summaries
            .iter()
            .filter(|s| s.label == IntervalLabel::Steady)
    }
}

/// Analyze one track. Never fails: degenerate input yields empty or
/// all-Recovery results.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use workout_intervals::{analyze_track, AnalysisConfig, Fix};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
/// // ~3.3 m/s due north, one fix every 3 seconds
/// let fixes: Vec<Fix> = (0..100)
///     .map(|i| Fix::new(51.5 + i as f64 * 0.00009, -0.12, t0 + Duration::seconds(i * 3)))
///     .collect();
///
/// let analysis = analyze_track(&fixes, &AnalysisConfig::default());
/// assert_eq!(analysis.report().pace_data.len(), 100);
/// ```
pub fn analyze_track(fixes: &[Fix], config: &AnalysisConfig) -> TrackAnalysis {
    let segments = derive_segments(fixes, config);
    let pace = smooth_pace(&segments, config);
    let provisional_labels = classify(&pace, config);
    let refined = refine(&provisional_labels, &segments, config);
    let summaries = summarize(fixes, &refined);

    info!(
        "[Intervals] Analyzed {} fixes: {} intervals ({} steady, {} real)",
        fixes.len(),
        summaries.len(),
        summaries
            .iter()
            .filter(|s| s.label == IntervalLabel::Steady)
            .count(),
        summaries.iter().filter(|s| s.is_real).count()
    );

    TrackAnalysis {
        fixes: fixes.to_vec(),
        segments,
        pace,
        provisional_labels,
        refined,
        summaries,
        config: config.clone(),
    }
}

/// Decode a JSON fix table, resolve params and analyze.
///
/// Input and configuration errors are fatal; no partial report is produced.
pub fn run_analysis(track_json: &str, params: &AnalysisParams) -> Result<AnalysisReport> {
    let config = AnalysisConfig::resolve(params)?;
    let fixes = parse_track_json(track_json)?;
    Ok(analyze_track(&fixes, &config).report())
}

/// Analyze independent tracks one after another.
pub fn analyze_tracks(tracks: &[Vec<Fix>], config: &AnalysisConfig) -> Vec<TrackAnalysis> {
    tracks
        .iter()
        .map(|fixes| analyze_track(fixes, config))
        .collect()
}

/// Analyze independent tracks on the rayon pool. Output order matches input.
#[cfg(feature = "parallel")]
pub fn analyze_tracks_parallel(tracks: &[Vec<Fix>], config: &AnalysisConfig) -> Vec<TrackAnalysis> {
    if tracks.len() < 2 {
        return analyze_tracks(tracks, config);
    }

    info!("[Intervals] Analyzing {} tracks in parallel", tracks.len());
    tracks
        .par_iter()
        .map(|fixes| analyze_track(fixes, config))
        .collect()
}
