//! # Workout Intervals
//!
//! Pace smoothing and work/recovery interval detection for GPS running tracks.
//!
//! This library turns a time-ordered track of GPS + heart-rate fixes into:
//! - a chart-ready pace series (short-window pace plus a centered display average)
//! - a table of detected intervals, labeled Steady or Recovery, with distance,
//!   time, pace and heart rate
//!
//! ## Pipeline
//!
//! 1. [`segments`] - elapsed time and great-circle distance per step, with a
//!    speed-outlier filter and missing-position propagation
//! 2. [`smoothing`] - distance-weighted rolling pace over a short and a long window
//! 3. [`classify`] - provisional labels from the short/long pace deviation
//! 4. [`refine`] - demotion, iterative short-interval merging, real-interval marking
//! 5. [`summary`] / [`report`] - per-interval totals and output records
//!
//! ## Features
//!
//! - **`parallel`** - Analyze batches of independent tracks with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use workout_intervals::{run_analysis, AnalysisParams};
//!
//! let track = r#"[
//!     {"latitude": 51.5000, "longitude": -0.12, "time": "2024-05-01T07:00:00Z", "heart_rate": 140},
//!     {"latitude": 51.5001, "longitude": -0.12, "time": "2024-05-01T07:00:03Z", "heart_rate": 142}
//! ]"#;
//!
//! let report = run_analysis(track, &AnalysisParams::default()).unwrap();
//! assert_eq!(report.pace_data.len(), 2);
//! println!("{}", report.to_json().unwrap());
//! ```

// Unified error handling
pub mod error;
pub use error::{IntervalError, Result};

// Analysis configuration (params in, resolved config out)
pub mod config;
pub use config::{AnalysisConfig, AnalysisParams};

// Fix table ingestion and validation
pub mod track;
pub use track::{parse_track_json, validate_fixes, Fix};

// Geographic utilities
pub mod geo_utils;

// Pipeline stages
pub mod segments;
pub use segments::{derive_segments, Segment};

pub mod smoothing;
pub use smoothing::{smooth_pace, PaceSeries};

pub mod intervals;
pub use intervals::{interval_ids, interval_spans, IntervalLabel, IntervalSpan, IntervalTotals};

pub mod classify;
pub use classify::classify;

pub mod refine;
pub use refine::{refine, MergeReport, RefinedIntervals};

pub mod summary;
pub use summary::{format_pace, format_time, IntervalSummary};

// Output records
pub mod report;
pub use report::{AnalysisReport, Bpm, IntervalRecord, PaceRecord};

// Orchestration
pub mod analysis;
pub use analysis::{analyze_track, analyze_tracks, run_analysis, TrackAnalysis};
#[cfg(feature = "parallel")]
pub use analysis::analyze_tracks_parallel;
