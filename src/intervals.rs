//! Interval labels and the interval partition derived from them.
//!
//! Interval identity is a pure function of the label sequence: a maximal run
//! of equal labels is one interval, numbered from 1 along the timeline. Spans
//! are recomputed from scratch after every relabeling, never patched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::segments::Segment;

/// Per-fix effort label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalLabel {
    /// Work effort
    Steady,
    /// Provisional label for a slowdown; always demoted before reporting
    #[serde(rename = "Slow Interval")]
    SlowTransition,
    /// Rest or easy jog
    Recovery,
}

impl IntervalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalLabel::Steady => "Steady",
            IntervalLabel::SlowTransition => "Slow Interval",
            IntervalLabel::Recovery => "Recovery",
        }
    }
}

impl fmt::Display for IntervalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A maximal run of fixes sharing one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSpan {
    /// 1-based ordinal along the timeline
    pub id: u32,
    pub label: IntervalLabel,
    /// First fix index (inclusive)
    pub start: usize,
    /// Last fix index (exclusive)
    pub end: usize,
}

impl IntervalSpan {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Sum the segments inside this span.
    pub fn totals(&self, segments: &[Segment]) -> IntervalTotals {
        IntervalTotals::from_segments(&segments[self.range()])
    }
}

/// Run-length encode a label sequence into spans.
pub fn interval_spans(labels: &[IntervalLabel]) -> Vec<IntervalSpan> {
    let mut spans: Vec<IntervalSpan> = Vec::new();

    for (i, &label) in labels.iter().enumerate() {
        if let Some(span) = spans.last_mut().filter(|s| s.label == label) {
            span.end = i + 1;
            continue;
        }
        let id = spans.len() as u32 + 1;
        spans.push(IntervalSpan {
            id,
            label,
            start: i,
            end: i + 1,
        });
    }

    spans
}

/// Per-fix interval ids (1-based, contiguous, non-decreasing).
pub fn interval_ids(labels: &[IntervalLabel]) -> Vec<u32> {
    let mut ids = Vec::with_capacity(labels.len());
    for span in interval_spans(labels) {
        ids.extend(std::iter::repeat(span.id).take(span.len()));
    }
    ids
}

/// Summed distance and time over a run of segments.
///
/// Undefined segment values contribute nothing; a run with no defined values
/// sums to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntervalTotals {
    pub distance_km: f64,
    pub time_seconds: f64,
}

impl IntervalTotals {
    pub fn from_segments(segments: &[Segment]) -> Self {
        segments.iter().fold(Self::default(), |acc, s| Self {
            distance_km: acc.distance_km + s.distance_km.unwrap_or(0.0),
            time_seconds: acc.time_seconds + s.time_seconds.unwrap_or(0.0),
        })
    }

    /// Overall pace in min/km, undefined without positive distance.
    pub fn pace_min_per_km(&self) -> Option<f64> {
        if self.distance_km > 0.0 {
            Some((self.time_seconds / 60.0) / self.distance_km)
        } else {
            None
        }
    }
}
