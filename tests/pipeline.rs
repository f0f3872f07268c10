//! End-to-end tests over synthetic tracks.

use chrono::{DateTime, Duration, TimeZone, Utc};
use workout_intervals::refine::merge_short_intervals;
use workout_intervals::{
    analyze_track, interval_spans, run_analysis, AnalysisConfig, AnalysisParams, Bpm, Fix,
    IntervalError, IntervalLabel,
};

/// Degrees of latitude per km on a 6371 km sphere.
const LAT_DEG_PER_KM: f64 = 1.0 / 111.19492664455873;
const STEP_SECS: i64 = 5;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap()
}

/// Straight-line track heading north, one fix every 5 s, built from
/// `(fix count, pace in min/km)` phases.
fn track_from_phases(phases: &[(usize, f64)], heart_rate: Option<f64>) -> Vec<Fix> {
    let t0 = start_time();
    let mut lat = 51.5;
    let mut elapsed = 0;

    let fix_at = |lat: f64, elapsed: i64| {
        let fix = Fix::new(lat, -0.12, t0 + Duration::seconds(elapsed));
        match heart_rate {
            Some(hr) => fix.with_heart_rate(hr),
            None => fix,
        }
    };

    let mut fixes = vec![fix_at(lat, elapsed)];
    for &(count, pace) in phases {
        for _ in 0..count {
            let km = STEP_SECS as f64 / 60.0 / pace;
            lat += km * LAT_DEG_PER_KM;
            elapsed += STEP_SECS;
            fixes.push(fix_at(lat, elapsed));
        }
    }
    fixes
}

/// 3 x (2 min at 4:00/km, 2 min at 8:00/km).
fn interval_workout() -> Vec<Fix> {
    track_from_phases(
        &[
            (24, 4.0),
            (24, 8.0),
            (24, 4.0),
            (24, 8.0),
            (24, 4.0),
            (24, 8.0),
        ],
        Some(160.0),
    )
}

fn track_json(fixes: &[Fix]) -> String {
    serde_json::to_string(fixes).unwrap()
}

#[test]
fn test_interval_workout_detects_three_reps() {
    init_logging();
    let fixes = interval_workout();
    let analysis = analyze_track(&fixes, &AnalysisConfig::default());
    let report = analysis.report();

    assert_eq!(report.pace_data.len(), fixes.len());

    let steady = &report.summary_data;
    assert_eq!(steady.len(), 3);
    assert_eq!(steady.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3, 5]);
    assert!(steady.iter().all(|r| r.is_real_interval));
    assert!(steady.iter().all(|r| r.interval_type == IntervalLabel::Steady));

    assert_eq!(steady[0].total_time, "00:02:10");
    assert_eq!(steady[0].total_distance_m, 500);
    assert_eq!(steady[0].average_pace, "04:10");
    assert_eq!(steady[0].recovery_time, "00:00:50");

    assert_eq!(steady[1].total_time, "00:03:10");
    assert_eq!(steady[1].total_distance_m, 600);
    assert_eq!(steady[1].average_pace, "04:54");

    assert_eq!(steady[2].recovery_time, "00:01:50");
    assert_eq!(steady[0].average_heart_rate, Bpm::Value(160));
    assert_eq!(steady[0].max_heart_rate, Bpm::Value(160));
}

#[test]
fn test_recovery_intervals_are_summarized_but_not_reported() {
    let analysis = analyze_track(&interval_workout(), &AnalysisConfig::default());

    let labels: Vec<IntervalLabel> = analysis.summaries.iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        vec![
            IntervalLabel::Steady,
            IntervalLabel::Recovery,
            IntervalLabel::Steady,
            IntervalLabel::Recovery,
            IntervalLabel::Steady,
            IntervalLabel::Recovery,
        ]
    );
    assert_eq!(analysis.steady_intervals().count(), 3);
    // 7:59.8 per km rounds up into the next minute
    assert_eq!(analysis.summaries[1].formatted_pace(0.02), "08:00");
    assert!(analysis
        .report()
        .summary_data
        .iter()
        .all(|r| r.interval_type != IntervalLabel::Recovery));
}

#[test]
fn test_final_partition_covers_track() {
    let fixes = interval_workout();
    let analysis = analyze_track(&fixes, &AnalysisConfig::default());

    let mut next_start = 0;
    for (i, span) in analysis.refined.spans.iter().enumerate() {
        assert_eq!(span.id as usize, i + 1);
        assert_eq!(span.start, next_start);
        next_start = span.end;
    }
    assert_eq!(next_start, fixes.len());

    let ids = analysis.refined.interval_ids();
    assert_eq!(ids.len(), fixes.len());
    assert!(ids.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));
    assert!(analysis
        .refined
        .labels
        .iter()
        .all(|l| *l != IntervalLabel::SlowTransition));
}

#[test]
fn test_merge_loop_is_idempotent_on_its_output() {
    let fixes = interval_workout();
    let config = AnalysisConfig::default();
    let analysis = analyze_track(&fixes, &config);
    assert!(analysis.refined.merge.converged);

    let mut labels = analysis.refined.labels.clone();
    let rerun = merge_short_intervals(&mut labels, &analysis.segments, &config);

    assert_eq!(rerun.passes, 0);
    assert_eq!(labels, analysis.refined.labels);
}

#[test]
fn test_constant_pace_track_is_one_interval() {
    let config = AnalysisConfig::default();

    let long = analyze_track(&track_from_phases(&[(39, 5.0)], None), &config);
    assert_eq!(long.summaries.len(), 1);
    assert_eq!(long.summaries[0].totals.time_seconds, 195.0);
    assert!(long.summaries[0].is_real);

    let short = analyze_track(&track_from_phases(&[(7, 5.0)], None), &config);
    assert_eq!(short.summaries.len(), 1);
    assert_eq!(short.summaries[0].totals.time_seconds, 35.0);
    assert!(!short.summaries[0].is_real);
    assert_eq!(short.report().summary_data[0].average_heart_rate, Bpm::NotAvailable);
}

#[test]
fn test_gps_jump_is_zeroed_through_pipeline() {
    let t0 = start_time();
    let fixes = vec![
        Fix::new(51.5, -0.12, t0),
        Fix::new(51.5 + LAT_DEG_PER_KM, -0.12, t0 + Duration::seconds(1)),
    ];
    let analysis = analyze_track(&fixes, &AnalysisConfig::default());
    assert_eq!(analysis.segments[1].distance_km, Some(0.0));
    assert_eq!(analysis.segments[1].time_seconds, Some(1.0));
}

#[test]
fn test_missing_position_excluded_from_both_segments() {
    let mut fixes = track_from_phases(&[(10, 5.0)], None);
    fixes[4].latitude = None;
    let analysis = analyze_track(&fixes, &AnalysisConfig::default());

    assert_eq!(analysis.segments[4].distance_km, None);
    assert_eq!(analysis.segments[5].distance_km, None);
    assert!(analysis.segments[3].distance_km.is_some());
    assert!(analysis.segments[6].distance_km.is_some());
}

#[test]
fn test_all_missing_positions_degrade_gracefully() {
    let t0 = start_time();
    let fixes: Vec<Fix> = (0..30)
        .map(|i| Fix {
            time: Some(t0 + Duration::seconds(i * STEP_SECS)),
            heart_rate: Some(120.0),
            ..Default::default()
        })
        .collect();

    let analysis = analyze_track(&fixes, &AnalysisConfig::default());
    assert!(analysis.segments.iter().all(|s| s.distance_km.is_none()));
    assert!(analysis.pace.pace_min_per_km.iter().all(|p| p.is_none()));
    assert!(analysis
        .summaries
        .iter()
        .all(|s| s.label == IntervalLabel::Recovery || !s.is_real));

    let report = analysis.report();
    assert!(report.summary_data.is_empty());
    assert_eq!(report.pace_data.len(), 30);
    assert_eq!(report.pace_data[29].time_since_start_seconds, Some(145.0));
}

#[test]
fn test_run_analysis_json_envelope() {
    init_logging();
    let json = track_json(&interval_workout());
    let params = AnalysisParams::from_json(r#"{"smoothWin": 5, "lmaWin": 15, "minTimeSec": 50}"#).unwrap();

    let report = run_analysis(&json, &params).unwrap();
    let encoded: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    let summary = encoded["summaryData"].as_array().unwrap();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[0]["Type"], "Steady");
    assert_eq!(summary[0]["Average Pace (min/km)"], "04:10");

    let pace = encoded["paceData"].as_array().unwrap();
    assert_eq!(pace.len(), 145);
    assert_eq!(pace[0]["time"], "2024-05-01T07:00:00Z");
    assert_eq!(pace[0]["time_since_start_seconds"], 0.0);
    assert!(pace[0]["pace_min_per_km"].is_null());
    assert!(pace[10]["pace_lma_min_per_km"].is_number());
}

#[test]
fn test_run_analysis_rejects_corrupt_track() {
    let err = run_analysis(r#"[{"latitude": 51.5, "time": 12"#, &AnalysisParams::default()).unwrap_err();
    assert!(matches!(err, IntervalError::InvalidInput { .. }));

    let backwards = r#"[
        {"latitude": 51.5, "longitude": 0.0, "time": "2024-05-01T07:00:10Z"},
        {"latitude": 51.5, "longitude": 0.0, "time": "2024-05-01T07:00:00Z"}
    ]"#;
    let err = run_analysis(backwards, &AnalysisParams::default()).unwrap_err();
    assert!(matches!(err, IntervalError::NonMonotonicTime { index: 1 }));
}

#[test]
fn test_empty_track_yields_empty_report() {
    let report = run_analysis("[]", &AnalysisParams::default()).unwrap();
    assert!(report.summary_data.is_empty());
    assert!(report.pace_data.is_empty());
    assert_eq!(report.to_json().unwrap(), r#"{"summaryData":[],"paceData":[]}"#);
}

#[test]
fn test_thresholds_are_per_call() {
    let fixes = interval_workout();

    // a very high minimum duration leaves nothing real
    let strict = AnalysisConfig::default().with_min_time_sec(10_000.0);
    let analysis = analyze_track(&fixes, &strict);
    assert!(analysis.summaries.iter().all(|s| !s.is_real));

    // defaults are untouched by the call above
    let default_run = analyze_track(&fixes, &AnalysisConfig::default());
    assert_eq!(default_run.report().summary_data.len(), 3);
    assert_eq!(interval_spans(&default_run.refined.labels).len(), 6);
}
