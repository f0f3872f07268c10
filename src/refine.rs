//! Interval refinement.
//!
//! Turns the provisional Steady/SlowTransition labeling into a stable
//! Steady/Recovery partition:
//!
//! 1. every slow transition becomes Recovery
//! 2. Steady intervals that are too slow or too short in distance become Recovery
//! 3. intervals shorter than `min_time_sec` are absorbed into a neighbor,
//!    pass after pass, until nothing changes or the pass cap is reached
//! 4. intervals lasting at least `min_time_sec` are marked real
//!
//! Every stage works on the label sequence and re-derives the spans from it,
//! so the partition can never drift out of sync with the labels.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::intervals::{interval_ids, interval_spans, IntervalLabel, IntervalSpan, IntervalTotals};
use crate::segments::Segment;

/// How the short-interval merge loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Passes that relabeled at least one interval
    pub passes: usize,
    /// Short intervals relabeled, summed over all passes
    pub merged: usize,
    /// False only when the pass cap stopped a labeling that was still changing
    pub converged: bool,
}

/// Final labeling with its partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedIntervals {
    /// Per-fix label, Steady or Recovery only
    pub labels: Vec<IntervalLabel>,
    pub spans: Vec<IntervalSpan>,
    /// Totals per span, same order as `spans`
    pub totals: Vec<IntervalTotals>,
    /// Real flag per span, same order as `spans`
    pub is_real: Vec<bool>,
    pub merge: MergeReport,
}

impl RefinedIntervals {
    /// Per-fix interval ids.
    pub fn interval_ids(&self) -> Vec<u32> {
        interval_ids(&self.labels)
    }
}

/// Stage 1: every SlowTransition becomes Recovery. Returns the number of fixes relabeled.
pub fn demote_transitions(labels: &mut [IntervalLabel]) -> usize {
    let mut count = 0;
    for label in labels.iter_mut() {
        if *label == IntervalLabel::SlowTransition {
            *label = IntervalLabel::Recovery;
            count += 1;
        }
    }
    count
}

/// Stage 2: demote Steady intervals with pace at or slower than
/// `min_interval_pace_per_km`, or covering less than `min_distance_km`.
/// Returns the number of intervals demoted.
pub fn demote_low_effort(
    labels: &mut [IntervalLabel],
    segments: &[Segment],
    config: &AnalysisConfig,
) -> usize {
    let low_effort: Vec<IntervalSpan> = interval_spans(labels)
        .into_iter()
        .filter(|span| span.label == IntervalLabel::Steady)
        .filter(|span| {
            let totals = span.totals(segments);
            let too_slow = totals
                .pace_min_per_km()
                .is_some_and(|pace| pace >= config.min_interval_pace_per_km);
            too_slow || totals.distance_km < config.min_distance_km
        })
        .collect();

    for span in &low_effort {
        labels[span.range()].fill(IntervalLabel::Recovery);
    }
    low_effort.len()
}

/// Pick the neighbor a short interval merges into.
///
/// Preference: previous if it has the same label, next if it has the same
/// label, then previous, then next. `None` only for a lone interval.
pub fn merge_target(spans: &[IntervalSpan], index: usize) -> Option<usize> {
    let label = spans.get(index)?.label;
    let prev = index.checked_sub(1);
    let next = Some(index + 1).filter(|&i| i < spans.len());

    prev.filter(|&i| spans[i].label == label)
        .or_else(|| next.filter(|&i| spans[i].label == label))
        .or(prev)
        .or(next)
}

fn short_intervals(spans: &[IntervalSpan], segments: &[Segment], config: &AnalysisConfig) -> Vec<usize> {
    spans
        .iter()
        .enumerate()
        .filter(|(_, span)| span.totals(segments).time_seconds < config.min_time_sec)
        .map(|(index, _)| index)
        .collect()
}

/// Relabel each short interval to its target's label, reading targets from
/// the snapshot `spans` only. Returns the number of intervals that changed.
fn merge_pass(labels: &mut [IntervalLabel], spans: &[IntervalSpan], short: &[usize]) -> usize {
    let mut changed = 0;
    for &index in short {
        let Some(target) = merge_target(spans, index) else {
            continue;
        };
        let target_label = spans[target].label;
        let run = &mut labels[spans[index].range()];
        if run.iter().any(|&l| l != target_label) {
            run.fill(target_label);
            changed += 1;
        }
    }
    changed
}

/// Stage 3: absorb short intervals into neighbors until a fixed point or the
/// pass cap. Short intervals may survive; that is not an error.
pub fn merge_short_intervals(
    labels: &mut [IntervalLabel],
    segments: &[Segment],
    config: &AnalysisConfig,
) -> MergeReport {
    let mut report = MergeReport::default();

    loop {
        let spans = interval_spans(labels);
        let short = short_intervals(&spans, segments, config);
        if short.is_empty() {
            report.converged = true;
            return report;
        }

        if report.passes == config.max_merge_iterations {
            // A lone interval has nowhere to go, so the labeling is still stable.
            report.converged = spans.len() <= 1;
            if !report.converged {
                debug!(
                    "[Refine] Merge stopped at the {} pass cap with {} short intervals left",
                    config.max_merge_iterations,
                    short.len()
                );
            }
            return report;
        }

        let changed = merge_pass(labels, &spans, &short);
        if changed == 0 {
            report.converged = true;
            return report;
        }
        report.passes += 1;
        report.merged += changed;
    }
}

/// Stage 4: real flag per span.
pub fn mark_real(totals: &[IntervalTotals], config: &AnalysisConfig) -> Vec<bool> {
    totals
        .iter()
        .map(|t| t.time_seconds >= config.min_time_sec)
        .collect()
}

/// Run all refinement stages over a provisional labeling.
pub fn refine(
    provisional: &[IntervalLabel],
    segments: &[Segment],
    config: &AnalysisConfig,
) -> RefinedIntervals {
    let mut labels = provisional.to_vec();

    let transitions = demote_transitions(&mut labels);
    let low_effort = demote_low_effort(&mut labels, segments, config);
    let merge = merge_short_intervals(&mut labels, segments, config);

    let spans = interval_spans(&labels);
    let totals: Vec<IntervalTotals> = spans.iter().map(|s| s.totals(segments)).collect();
    let is_real = mark_real(&totals, config);

    debug!(
        "[Refine] {} transition points demoted, {} low-effort intervals demoted, \
         {} merges over {} passes (converged: {}), {} final intervals ({} real)",
        transitions,
        low_effort,
        merge.merged,
        merge.passes,
        merge.converged,
        spans.len(),
        is_real.iter().filter(|r| **r).count()
    );

    RefinedIntervals {
        labels,
        spans,
        totals,
        is_real,
        merge,
    }
}
