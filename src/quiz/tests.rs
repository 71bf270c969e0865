#![expect(clippy::unwrap_used, clippy::indexing_slicing)]
mod session;

use crate::enrich::{BattingRow, BowlingRow, QuizFrames, is_out};
use polars::prelude::*;

/// A home-club innings in format 1 by a cohort member, nothing hit to the
/// boundary.
fn bat(player: &str, runs: i64, dismissal: &str) -> BattingRow {
    BattingRow {
        id: 0,
        game_id: Some(1),
        innings_id: Some(1),
        player_id: Some(1),
        player: Some(player.to_owned()),
        format_id: Some(1),
        runs: Some(runs),
        balls: None,
        fours: Some(0),
        sixes: Some(0),
        dismissal: Some(dismissal.to_owned()),
        out: i64::from(is_out(dismissal)),
        is_home: true,
        on_tour: false,
        in_cohort: true,
    }
}

fn toured(row: BattingRow) -> BattingRow {
    BattingRow {
        on_tour: true,
        ..row
    }
}

fn bowl(player: &str, runs: i64, wickets: i64) -> BowlingRow {
    BowlingRow {
        id: 0,
        game_id: Some(1),
        innings_id: Some(2),
        player_id: Some(1),
        player: Some(player.to_owned()),
        format_id: Some(1),
        balls: None,
        maidens: None,
        runs: Some(runs),
        wickets: Some(wickets),
        is_home: true,
        on_tour: false,
        in_cohort: true,
    }
}

fn toured_bowl(row: BowlingRow) -> BowlingRow {
    BowlingRow {
        on_tour: true,
        ..row
    }
}

fn frames(batting: &[BattingRow], bowling: &[BowlingRow]) -> QuizFrames {
    QuizFrames::from_rows(batting, bowling).unwrap()
}

fn repeat<T: Clone>(row: T, times: usize) -> Vec<T> {
    vec![row; times]
}

fn strs(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|s| s.unwrap().to_owned())
        .collect()
}

fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}
