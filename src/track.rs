//! Fix table: the timestamped samples a track is made of.
//!
//! Fixes arrive already parsed from the recording format. This module decodes
//! them from JSON and enforces the invariants the pipeline relies on: positions
//! in range and timestamps that never go backwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};

/// One recorded sample. Every field may be missing.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use workout_intervals::Fix;
///
/// let t = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
/// let fix = Fix::new(51.5074, -0.1278, t).with_heart_rate(142.0);
/// assert!(fix.has_position());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fix {
    #[serde(alias = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(alias = "lon", alias = "lng", default)]
    pub longitude: Option<f64>,
    /// Carried through for completeness; no stage reads it
    #[serde(alias = "ele", default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// Beats per minute
    #[serde(alias = "hr", default)]
    pub heart_rate: Option<f64>,
}

impl Fix {
    /// Create a fix with a position and timestamp.
    pub fn new(latitude: f64, longitude: f64, time: DateTime<Utc>) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            elevation: None,
            time: Some(time),
            heart_rate: None,
        }
    }

    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    pub fn with_elevation(mut self, meters: f64) -> Self {
        self.elevation = Some(meters);
        self
    }

    /// Latitude and longitude, if both are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn has_position(&self) -> bool {
        self.position().is_some()
    }
}

/// Decode a JSON array of fixes and validate it.
///
/// Any decoding problem is fatal: a corrupt track is never partially analyzed.
pub fn parse_track_json(json: &str) -> Result<Vec<Fix>> {
    let fixes: Vec<Fix> =
        serde_json::from_str(json).map_err(|e| IntervalError::InvalidInput {
            message: e.to_string(),
        })?;
    validate_fixes(&fixes)?;
    Ok(fixes)
}

/// Check value ranges and that defined timestamps are non-decreasing.
///
/// Duplicate timestamps are allowed. Fixes without a timestamp are skipped by
/// the ordering check.
pub fn validate_fixes(fixes: &[Fix]) -> Result<()> {
    let mut last_time: Option<DateTime<Utc>> = None;

    for (index, fix) in fixes.iter().enumerate() {
        if let Some(lat) = fix.latitude {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err(IntervalError::invalid_fix(
                    index,
                    format!("latitude {} out of range", lat),
                ));
            }
        }
        if let Some(lon) = fix.longitude {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(IntervalError::invalid_fix(
                    index,
                    format!("longitude {} out of range", lon),
                ));
            }
        }
        if let Some(hr) = fix.heart_rate {
            if !hr.is_finite() || hr < 0.0 {
                return Err(IntervalError::invalid_fix(
                    index,
                    format!("heart rate {} is not a valid bpm value", hr),
                ));
            }
        }
        if let Some(time) = fix.time {
            if matches!(last_time, Some(prev) if time < prev) {
                return Err(IntervalError::NonMonotonicTime { index });
            }
            last_time = Some(time);
        }
    }

    Ok(())
}
