//! Segment derivation: elapsed time and usable distance between consecutive fixes.
//!
//! The segment at index `i` describes the step from fix `i - 1` to fix `i`, so
//! there is one segment per fix and the first one is always undefined.
//!
//! Two policies shape the usable distance:
//! - a step faster than `max_speed_kmh` is a GPS jump; its distance becomes 0
//!   while its time is kept, so the sample reads as stationary
//! - a step with a missing position on either end has no distance at all and
//!   is excluded from sums (this wins over the speed policy)

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::geo_utils::haversine_km;
use crate::track::Fix;

/// The step ending at one fix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    /// Seconds since the previous fix. `None` for the first fix or a missing timestamp.
    pub time_seconds: Option<f64>,
    /// Usable distance in km. `None` when either position is missing.
    pub distance_km: Option<f64>,
}

impl Segment {
    /// Instantaneous speed of a raw step. Zero when the elapsed time is not
    /// positive, which only guards the division.
    fn speed_kmh(raw_distance_km: f64, time_seconds: Option<f64>) -> f64 {
        match time_seconds {
            Some(t) if t > 0.0 => raw_distance_km / (t / 3600.0),
            _ => 0.0,
        }
    }
}

/// Derive one segment per fix.
pub fn derive_segments(fixes: &[Fix], config: &AnalysisConfig) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(fixes.len());
    let mut outliers = 0usize;
    let mut gaps = 0usize;

    if !fixes.is_empty() {
        segments.push(Segment::default());
    }

    for pair in fixes.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        let time_seconds = match (prev.time, curr.time) {
            (Some(a), Some(b)) => Some((b - a).num_milliseconds() as f64 / 1000.0),
            _ => None,
        };

        let distance_km = match (prev.position(), curr.position()) {
            (Some((lat1, lon1)), Some((lat2, lon2))) => {
                let raw = haversine_km(lat1, lon1, lat2, lon2);
                if Segment::speed_kmh(raw, time_seconds) > config.max_speed_kmh {
                    outliers += 1;
                    Some(0.0)
                } else {
                    Some(raw)
                }
            }
            _ => {
                gaps += 1;
                None
            }
        };

        segments.push(Segment {
            time_seconds,
            distance_km,
        });
    }

    debug!(
        "[Segments] Derived {} segments ({} speed outliers zeroed, {} position gaps)",
        segments.len(),
        outliers,
        gaps
    );

    segments
}
