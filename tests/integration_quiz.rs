//! End-to-end tests: fixture document on disk, through enrichment and the
//! Parquet caches, to quiz answers.

#![expect(clippy::unwrap_used, clippy::indexing_slicing)]

use badger_stats::config::{QuizConfig, SourceConfig};
use badger_stats::data::{Fetcher, load_tables};
use badger_stats::enrich::{QuizFrames, columns, quiz_frames, refresh_frames};
use badger_stats::error::{Result, StatsError};
use badger_stats::quiz::plot::AGGREGATE_LABEL;
use badger_stats::quiz::{HazardChart, Session, queries};
use pretty_assertions::assert_eq;
use std::path::Path;

const FIXTURE: &str = "testdata/sample_data.json";

struct Offline;

impl Fetcher for Offline {
    fn fetch(&self, url: &str) -> Result<String> {
        Err(StatsError::Fetch(format!("GET {url}: network disabled in tests")))
    }
}

fn config_in(dir: &Path) -> QuizConfig {
    let mut config = QuizConfig {
        source: SourceConfig {
            cache_dir: dir.to_path_buf(),
            ..SourceConfig::default()
        },
        ..QuizConfig::default()
    };
    config.enrichment.cohort = ["test-player", "andrew-thorpe"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    config
}

fn setup() -> (tempfile::TempDir, QuizConfig, QuizFrames) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::copy(FIXTURE, config.source.raw_cache_path()).unwrap();
    let frames = quiz_frames(&config, &Offline).unwrap();
    (dir, config, frames)
}

fn column_strs(df: &polars::prelude::DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|s| s.unwrap().to_owned())
        .collect()
}

#[test]
fn test_fixture_loads_every_collection() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::copy(FIXTURE, config.source.raw_cache_path()).unwrap();

    let tables = load_tables(&config.source, &Offline).unwrap();
    let counts: Vec<usize> = tables.row_counts().iter().map(|(_, n)| *n).collect();
    assert!(counts.iter().all(|n| *n > 0), "{:?}", tables.row_counts());
    assert_eq!(tables.batting.len(), 6);
    assert_eq!(tables.bowling.len(), 3);
}

#[test]
fn test_enriched_frames_are_cached() {
    let (_dir, config, frames) = setup();
    assert!(config.source.batting_cache_path().exists());
    assert!(config.source.bowling_cache_path().exists());

    // Without the raw document the Parquet caches must be enough.
    std::fs::remove_file(config.source.raw_cache_path()).unwrap();
    let cached = quiz_frames(&config, &Offline).unwrap();
    assert!(cached.batting.equals_missing(&frames.batting));
    assert!(cached.bowling.equals_missing(&frames.bowling));
}

#[test]
fn test_offline_refresh_keeps_fixture() {
    let (_dir, config, frames) = setup();

    assert!(refresh_frames(&config, &Offline).is_err());
    assert_eq!(
        std::fs::read_to_string(config.source.raw_cache_path()).unwrap(),
        std::fs::read_to_string(FIXTURE).unwrap()
    );
    let cached = quiz_frames(&config, &Offline).unwrap();
    assert!(cached.batting.equals_missing(&frames.batting));
}

#[test]
fn test_format_averages_end_to_end() {
    let (_dir, config, frames) = setup();
    let format = config.report.format_id;

    let bat = queries::format_batting_averages(&frames.batting, format).unwrap();
    assert_eq!(column_strs(&bat, columns::PLAYER), vec!["test-player", "andrew-thorpe"]);
    let runs = bat.column(columns::RUNS).unwrap().as_materialized_series().clone();
    let outs = bat.column(columns::OUT).unwrap().as_materialized_series().clone();
    let aves = bat.column(queries::AVE).unwrap().as_materialized_series().clone();
    assert_eq!(runs.i64().unwrap().get(0), Some(45));
    assert_eq!(outs.i64().unwrap().get(0), Some(0));
    assert_eq!(aves.f64().unwrap().get(0), Some(f64::INFINITY));
    assert_eq!(aves.f64().unwrap().get(1), Some(26.0));

    let bowl = queries::format_bowling_averages(&frames.bowling, format).unwrap();
    assert_eq!(column_strs(&bowl, columns::PLAYER)[0], "andrew-thorpe");
    let bowl_aves = bowl.column(queries::AVE).unwrap().as_materialized_series().clone();
    assert_eq!(bowl_aves.f64().unwrap().get(0), Some(12.5));
}

#[test]
fn test_unclaimed_scores_end_to_end() {
    let (_dir, _config, frames) = setup();
    assert_eq!(queries::lowest_unrecorded_score(&frames.batting).unwrap(), 1);
    assert_eq!(queries::lowest_unrecorded_score(&frames.bowling).unwrap(), 1);
}

#[test]
fn test_distance_run_end_to_end() {
    let (_dir, config, frames) = setup();
    let d = queries::running_distance(&frames.batting, "andrew-thorpe", config.report.metres_per_run)
        .unwrap()
        .unwrap();
    assert_eq!((d.runs, d.fours, d.sixes), (52, 2, 1));
    assert_eq!(format!("{:.2}", d.kilometres), "0.67");

    let single = queries::kilometres_run(queries::runs_run(40, 2, 1), config.report.metres_per_run);
    assert_eq!(format!("{single:.2}"), "0.46");
}

#[test]
fn test_rare_appearances_end_to_end() {
    let (_dir, _config, frames) = setup();
    assert_eq!(
        queries::rare_appearances(&frames.batting).unwrap(),
        vec!["andrew-thorpe", "rookie"]
    );
}

#[test]
fn test_session_answers_from_cached_frames() {
    let (_dir, config, frames) = setup();
    let mut session = Session::new(frames, config.report, Vec::<HazardChart>::new());

    let mut input = "3\n4\n10\nrookie\n10\nopp-bat\n0\n".as_bytes();
    let mut out = Vec::new();
    session.run(&mut input, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Lowest batting score not recorded is 1."));
    assert!(out.contains("andrew-thorpe has had to run 0.67 km"));
    assert!(out.contains(
        "Couldn't find opp-bat. Choose one of the following:\ntest-player andrew-thorpe rookie\n"
    ));

    let charts = session.into_charts();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0].labels(), vec![AGGREGATE_LABEL, "rookie"]);
    assert_eq!(charts[1].labels(), vec![AGGREGATE_LABEL]);
    assert_eq!(charts[1].x_range, [0.0, 75.0]);
}
