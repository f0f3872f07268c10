//! Provisional labeling by pace deviation from the local baseline.
//!
//! A point whose short-window pace is much slower than the long-window
//! baseline is marked as a slow transition. Only slowdowns are flagged; a
//! sudden fast burst stays Steady.

use log::debug;

use crate::config::AnalysisConfig;
use crate::intervals::IntervalLabel;
use crate::smoothing::PaceSeries;

/// `pace_lma - pace_min_per_km`, undefined where either pace is undefined.
pub fn pace_deviation(pace: &PaceSeries) -> Vec<Option<f64>> {
    pace.pace_lma
        .iter()
        .zip(&pace.pace_min_per_km)
        .map(|(lma, short)| match (lma, short) {
            (Some(lma), Some(short)) => Some(lma - short),
            _ => None,
        })
        .collect()
}

/// Label every point Steady or SlowTransition.
pub fn classify(pace: &PaceSeries, config: &AnalysisConfig) -> Vec<IntervalLabel> {
    let labels: Vec<IntervalLabel> = pace_deviation(pace)
        .into_iter()
        .map(|deviation| match deviation {
            Some(d) if d < -config.pace_difference_threshold => IntervalLabel::SlowTransition,
            _ => IntervalLabel::Steady,
        })
        .collect();

    debug!(
        "[Classify] {} of {} points flagged as slow transitions",
        labels
            .iter()
            .filter(|l| **l == IntervalLabel::SlowTransition)
            .count(),
        labels.len()
    );

    labels
}
