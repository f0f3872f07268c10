//! Analysis configuration.
//!
//! Callers describe what they want with [`AnalysisParams`], where every field
//! is optional. [`AnalysisConfig::resolve`] fills in defaults for absent
//! fields only; an explicit zero is validated like any other value, never
//! silently swapped for a default.

use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};

/// Default short rolling window, in samples.
pub const DEFAULT_SMOOTH_WINDOW: usize = 5;
/// Default long rolling window, in samples.
pub const DEFAULT_LMA_WINDOW: usize = 15;
/// Default minimum interval duration, in seconds.
pub const DEFAULT_MIN_TIME_SEC: f64 = 50.0;
/// Default slowest pace still counted as effort, in min/km.
pub const DEFAULT_MIN_INTERVAL_PACE_PER_KM: f64 = 5.5;
/// Default pace deviation that flags a slow transition, in min/km.
pub const DEFAULT_PACE_DIFFERENCE_THRESHOLD: f64 = 1.0;
/// Speeds above this are treated as GPS jumps.
pub const DEFAULT_MAX_SPEED_KMH: f64 = 25.0;
/// Distance floor for pace reporting and for keeping a Steady interval.
pub const DEFAULT_MIN_DISTANCE_KM: f64 = 0.02;
/// Upper bound on short-interval merge passes.
pub const DEFAULT_MAX_MERGE_ITERATIONS: usize = 100;

/// Caller-supplied analysis options. Absent fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParams {
    #[serde(alias = "smooth_win", default, skip_serializing_if = "Option::is_none")]
    pub smooth_win: Option<usize>,
    #[serde(alias = "lma_win", default, skip_serializing_if = "Option::is_none")]
    pub lma_win: Option<usize>,
    #[serde(
        alias = "min_time_sec",
        alias = "min_segment_time_sec",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_time_sec: Option<f64>,
    #[serde(
        alias = "min_interval_pace_per_km",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_interval_pace_per_km: Option<f64>,
    #[serde(
        alias = "pace_difference_threshold",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pace_difference_threshold: Option<f64>,
}

impl AnalysisParams {
    /// Decode params from a JSON object. An empty string means "all defaults".
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| IntervalError::config(e.to_string()))
    }
}

/// Fully resolved configuration passed explicitly into every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Short rolling window in samples (current effort).
    /// Default: 5
    pub smooth_window: usize,

    /// Long rolling window in samples (local baseline, and display smoothing).
    /// Default: 15
    pub lma_window: usize,

    /// Intervals shorter than this are merged away and never marked real.
    /// Default: 50.0 seconds
    pub min_time_sec: f64,

    /// Steady intervals at or slower than this pace are demoted to Recovery.
    /// Default: 5.5 min/km
    pub min_interval_pace_per_km: f64,

    /// Short-window pace this much slower than the baseline starts a slow transition.
    /// Default: 1.0 min/km
    pub pace_difference_threshold: f64,

    /// Steps faster than this keep their time but contribute zero distance.
    /// Default: 25.0 km/h
    pub max_speed_kmh: f64,

    /// Minimum distance for a reportable pace and for a Steady interval.
    /// Default: 0.02 km
    pub min_distance_km: f64,

    /// Cap on short-interval merge passes.
    /// Default: 100
    pub max_merge_iterations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            smooth_window: DEFAULT_SMOOTH_WINDOW,
            lma_window: DEFAULT_LMA_WINDOW,
            min_time_sec: DEFAULT_MIN_TIME_SEC,
            min_interval_pace_per_km: DEFAULT_MIN_INTERVAL_PACE_PER_KM,
            pace_difference_threshold: DEFAULT_PACE_DIFFERENCE_THRESHOLD,
            max_speed_kmh: DEFAULT_MAX_SPEED_KMH,
            min_distance_km: DEFAULT_MIN_DISTANCE_KM,
            max_merge_iterations: DEFAULT_MAX_MERGE_ITERATIONS,
        }
    }
}

impl AnalysisConfig {
    /// Resolve caller params against the defaults and validate the result.
    pub fn resolve(params: &AnalysisParams) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            smooth_window: params.smooth_win.unwrap_or(defaults.smooth_window),
            lma_window: params.lma_win.unwrap_or(defaults.lma_window),
            min_time_sec: params.min_time_sec.unwrap_or(defaults.min_time_sec),
            min_interval_pace_per_km: params
                .min_interval_pace_per_km
                .unwrap_or(defaults.min_interval_pace_per_km),
            pace_difference_threshold: params
                .pace_difference_threshold
                .unwrap_or(defaults.pace_difference_threshold),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field is usable by the stages.
    pub fn validate(&self) -> Result<()> {
        if self.smooth_window == 0 {
            return Err(IntervalError::config("smoothWin must be at least 1"));
        }
        if self.lma_window == 0 {
            return Err(IntervalError::config("lmaWin must be at least 1"));
        }
        if !self.min_time_sec.is_finite() || self.min_time_sec < 0.0 {
            return Err(IntervalError::config(format!(
                "minTimeSec must be a non-negative number, got {}",
                self.min_time_sec
            )));
        }
        if !self.min_interval_pace_per_km.is_finite() || self.min_interval_pace_per_km <= 0.0 {
            return Err(IntervalError::config(format!(
                "minIntervalPacePerKm must be positive, got {}",
                self.min_interval_pace_per_km
            )));
        }
        if !self.pace_difference_threshold.is_finite() || self.pace_difference_threshold < 0.0 {
            return Err(IntervalError::config(format!(
                "paceDifferenceThreshold must be a non-negative number, got {}",
                self.pace_difference_threshold
            )));
        }
        if !self.max_speed_kmh.is_finite() || self.max_speed_kmh <= 0.0 {
            return Err(IntervalError::config("max_speed_kmh must be positive"));
        }
        if !self.min_distance_km.is_finite() || self.min_distance_km < 0.0 {
            return Err(IntervalError::config("min_distance_km must be non-negative"));
        }
        Ok(())
    }

    pub fn with_windows(mut self, smooth_window: usize, lma_window: usize) -> Self {
        self.smooth_window = smooth_window;
        self.lma_window = lma_window;
        self
    }

    pub fn with_min_time_sec(mut self, min_time_sec: f64) -> Self {
        self.min_time_sec = min_time_sec;
        self
    }

    pub fn with_min_interval_pace(mut self, pace_min_per_km: f64) -> Self {
        self.min_interval_pace_per_km = pace_min_per_km;
        self
    }

    pub fn with_pace_difference_threshold(mut self, threshold: f64) -> Self {
        self.pace_difference_threshold = threshold;
        self
    }

    pub fn with_max_merge_iterations(mut self, iterations: usize) -> Self {
        self.max_merge_iterations = iterations;
        self
    }
}
