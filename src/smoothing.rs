//! Pace smoothing.
//!
//! Pace is always a ratio of summed time to summed distance over a trailing
//! window of segments, so long slow samples weigh more than short fast ones.
//! Undefined segment values drop out of their own sum; a window with nothing
//! defined yields an undefined sum.
//!
//! The display series is different: a centered moving average of the
//! already-computed short-window pace, used only for charting.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::segments::Segment;

/// Per-fix pace values, all in min/km.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaceSeries {
    /// Short-window pace (current effort)
    pub pace_min_per_km: Vec<Option<f64>>,
    /// Long-window pace (local baseline for classification)
    pub pace_lma: Vec<Option<f64>>,
    /// Centered average of `pace_min_per_km` (display only)
    pub pace_lma_min_per_km: Vec<Option<f64>>,
}

impl PaceSeries {
    pub fn len(&self) -> usize {
        self.pace_min_per_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pace_min_per_km.is_empty()
    }
}

/// Trailing rolling sum with a minimum of one defined value per window.
pub fn rolling_sum(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            values[start..=i]
                .iter()
                .flatten()
                .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
        })
        .collect()
}

/// Trailing rolling pace in min/km over `window` segments.
pub fn rolling_pace(segments: &[Segment], window: usize) -> Vec<Option<f64>> {
    let times: Vec<Option<f64>> = segments.iter().map(|s| s.time_seconds).collect();
    let distances: Vec<Option<f64>> = segments.iter().map(|s| s.distance_km).collect();

    rolling_sum(&times, window)
        .into_iter()
        .zip(rolling_sum(&distances, window))
        .map(|(time_s, dist_km)| match (time_s, dist_km) {
            (Some(t), Some(d)) if d > 0.0 => Some((t / 60.0) / d),
            _ => None,
        })
        .collect()
}

/// Centered moving average over `window` samples, shrinking at both ends.
///
/// For an even window the extra sample falls before the center.
pub fn centered_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;
    let n = values.len();

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(behind);
            let end = (i + ahead).min(n - 1);
            let (sum, count) = values[start..=end]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count > 0 {
                Some(sum / count as f64)
            } else {
                None
            }
        })
        .collect()
}

/// Compute the short, long and display pace series.
pub fn smooth_pace(segments: &[Segment], config: &AnalysisConfig) -> PaceSeries {
    let pace_min_per_km = rolling_pace(segments, config.smooth_window);
    let pace_lma = rolling_pace(segments, config.lma_window);
    let pace_lma_min_per_km = centered_mean(&pace_min_per_km, config.lma_window);

    debug!(
        "[Smoothing] {} samples, {} with defined pace (windows {}/{})",
        pace_min_per_km.len(),
        pace_min_per_km.iter().filter(|p| p.is_some()).count(),
        config.smooth_window,
        config.lma_window
    );

    PaceSeries {
        pace_min_per_km,
        pace_lma,
        pace_lma_min_per_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(time: f64, dist: f64) -> Segment {
        Segment {
            time_seconds: Some(time),
            distance_km: Some(dist),
        }
    }

    #[test]
    fn test_rolling_sum_shrinks_at_start() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(
            rolling_sum(&values, 2),
            vec![Some(1.0), Some(3.0), Some(5.0), Some(7.0)]
        );
    }

    #[test]
    fn test_rolling_sum_skips_undefined() {
        let values = vec![None, Some(2.0), None, None];
        assert_eq!(rolling_sum(&values, 2), vec![None, Some(2.0), Some(2.0), None]);
    }

    #[test]
    fn test_pace_is_distance_weighted() {
        // 60 s over 0.1 km then 60 s over 0.3 km: 2 min / 0.4 km = 5 min/km,
        // not the mean of 10 and 3.33
        let segments = vec![Segment::default(), seg(60.0, 0.1), seg(60.0, 0.3)];
        let pace = rolling_pace(&segments, 5);
        assert_eq!(pace[0], None);
        assert!((pace[1].unwrap() - 10.0).abs() < 1e-9);
        assert!((pace[2].unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance_window_is_undefined() {
        let segments = vec![Segment::default(), seg(10.0, 0.0), seg(10.0, 0.0)];
        let pace = rolling_pace(&segments, 5);
        assert!(pace.iter().all(|p| p.is_none()));
    }

    #[test]
    fn test_missing_distance_excluded_not_zero() {
        let gap = Segment {
            time_seconds: Some(10.0),
            distance_km: None,
        };
        let segments = vec![Segment::default(), seg(30.0, 0.1), gap];
        let pace = rolling_pace(&segments, 5);
        // time still accumulates: 40 s over 0.1 km
        assert!((pace[2].unwrap() - (40.0 / 60.0) / 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_centered_mean_odd_window() {
        let values: Vec<Option<f64>> = (1..=5).map(|v| Some(v as f64)).collect();
        let smoothed = centered_mean(&values, 3);
        assert_eq!(
            smoothed,
            vec![Some(1.5), Some(2.0), Some(3.0), Some(4.0), Some(4.5)]
        );
    }

    #[test]
    fn test_centered_mean_even_window_leans_back() {
        let values: Vec<Option<f64>> = (1..=4).map(|v| Some(v as f64)).collect();
        // window 4 covers i-2..=i+1
        let smoothed = centered_mean(&values, 4);
        assert_eq!(smoothed[0], Some(1.5));
        assert_eq!(smoothed[2], Some(2.5));
        assert_eq!(smoothed[3], Some(3.0));
    }

    #[test]
    fn test_centered_mean_ignores_undefined() {
        let values = vec![None, Some(4.0), None];
        assert_eq!(centered_mean(&values, 3), vec![Some(4.0), Some(4.0), Some(4.0)]);
        assert_eq!(centered_mean(&[None, None], 3), vec![None, None]);
    }

    #[test]
    fn test_smooth_pace_lengths_match() {
        let segments = vec![Segment::default(), seg(5.0, 0.015), seg(5.0, 0.015)];
        let series = smooth_pace(&segments, &AnalysisConfig::default());
        assert_eq!(series.len(), 3);
        assert_eq!(series.pace_lma.len(), 3);
        assert_eq!(series.pace_lma_min_per_km.len(), 3);
    }
}
