//! Annotates every batting and bowling performance with the lookups and
//! flags the quiz questions filter on, and materialises the result as two
//! polars frames.
//!
//! Lookups never fail a row: an identifier that doesn't resolve leaves the
//! derived field empty (`None`), and membership flags computed from an
//! empty field come out `false`.

pub mod cache;

use crate::config::EnrichmentConfig;
use crate::data::model::{BattingPerformance, BowlingPerformance, GameId, InningsId};
use crate::data::tables::Tables;
use crate::error::Result;
use log::info;
use polars::prelude::*;

pub use cache::{load_cached_frames, quiz_frames, rebuild_frames, refresh_frames, save_frames};

pub const NOT_OUT: &str = "Not out";
pub const DID_NOT_BAT: &str = "Did not bat";
pub const RETIRED_PREFIX: &str = "Retired";

/// Column names shared by the enriched frames and the queries.
pub mod columns {
    pub const ID: &str = "id";
    pub const GAME_ID: &str = "game_id";
    pub const INNINGS_ID: &str = "innings_id";
    pub const PLAYER_ID: &str = "player_id";
    pub const PLAYER: &str = "player";
    pub const FORMAT_ID: &str = "format_id";
    pub const RUNS: &str = "runs";
    pub const BALLS: &str = "balls";
    pub const FOURS: &str = "fours";
    pub const SIXES: &str = "sixes";
    pub const DISMISSAL: &str = "dismissal";
    pub const OUT: &str = "out";
    pub const MAIDENS: &str = "maidens";
    pub const WICKETS: &str = "wickets";
    pub const IS_HOME: &str = "is_home";
    pub const ON_TOUR: &str = "on_tour";
    pub const IN_COHORT: &str = "in_cohort";
}

/// Whether a dismissal description ends the batter's innings.
///
/// "Not out", "Did not bat" and any "Retired..." entry are not outs;
/// everything else is.
pub fn is_out(dismissal: &str) -> bool {
    !(dismissal == NOT_OUT || dismissal == DID_NOT_BAT || dismissal.starts_with(RETIRED_PREFIX))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattingRow {
    pub id: u32,
    pub game_id: Option<u32>,
    pub innings_id: Option<u32>,
    pub player_id: Option<u32>,
    pub player: Option<String>,
    pub format_id: Option<u32>,
    pub runs: Option<i64>,
    pub balls: Option<i64>,
    pub fours: Option<i64>,
    pub sixes: Option<i64>,
    pub dismissal: Option<String>,
    /// 1 when dismissed, else 0
    pub out: i64,
    pub is_home: bool,
    pub on_tour: bool,
    pub in_cohort: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BowlingRow {
    pub id: u32,
    pub game_id: Option<u32>,
    pub innings_id: Option<u32>,
    pub player_id: Option<u32>,
    pub player: Option<String>,
    pub format_id: Option<u32>,
    pub balls: Option<i64>,
    pub maidens: Option<i64>,
    /// Runs conceded
    pub runs: Option<i64>,
    pub wickets: Option<i64>,
    pub is_home: bool,
    pub on_tour: bool,
    pub in_cohort: bool,
}

/// The two annotated tables every question reads from.
#[derive(Debug, Clone)]
pub struct QuizFrames {
    pub batting: DataFrame,
    pub bowling: DataFrame,
}

pub struct Enricher<'a> {
    tables: &'a Tables,
    config: &'a EnrichmentConfig,
}

fn count(value: Option<u32>) -> Option<i64> {
    value.map(i64::from)
}

impl<'a> Enricher<'a> {
    pub fn new(tables: &'a Tables, config: &'a EnrichmentConfig) -> Self {
        Self { tables, config }
    }

    /// True when the side batting in `innings` is the home club.
    fn home_side_batting(&self, innings: Option<InningsId>) -> bool {
        self.tables.innings_team(innings) == Some(self.config.home_team_id)
    }

    fn on_tour(&self, game: Option<GameId>) -> bool {
        self.tables
            .game_opposition(game)
            .is_some_and(|team| self.config.touring_team_ids.contains(&team))
    }

    fn in_cohort(&self, player: Option<&str>) -> bool {
        player.is_some_and(|slug| self.config.cohort.contains(slug))
    }

    pub fn batting_row(&self, perf: &BattingPerformance) -> BattingRow {
        let player = self.tables.player_slug(perf.player_id);
        BattingRow {
            id: perf.id.0,
            game_id: perf.game_id.map(|id| id.0),
            innings_id: perf.innings_id.map(|id| id.0),
            player_id: perf.player_id.map(|id| id.0),
            player: player.map(str::to_owned),
            format_id: self.tables.game_format(perf.game_id).map(|id| id.0),
            runs: count(perf.runs),
            balls: count(perf.balls),
            fours: count(perf.fours),
            sixes: count(perf.sixes),
            dismissal: perf.dismissal.clone(),
            out: i64::from(perf.dismissal.as_deref().is_none_or(is_out)),
            is_home: self.home_side_batting(perf.innings_id),
            on_tour: self.on_tour(perf.game_id),
            in_cohort: self.in_cohort(player),
        }
    }

    /// A bowler belongs to the home club when the batting side is *not*
    /// the home club.
    pub fn bowling_row(&self, perf: &BowlingPerformance) -> BowlingRow {
        let player = self.tables.player_slug(perf.player_id);
        BowlingRow {
            id: perf.id.0,
            game_id: perf.game_id.map(|id| id.0),
            innings_id: perf.innings_id.map(|id| id.0),
            player_id: perf.player_id.map(|id| id.0),
            player: player.map(str::to_owned),
            format_id: self.tables.game_format(perf.game_id).map(|id| id.0),
            balls: count(perf.balls),
            maidens: count(perf.maidens),
            runs: count(perf.runs),
            wickets: count(perf.wickets),
            is_home: !self.home_side_batting(perf.innings_id),
            on_tour: self.on_tour(perf.game_id),
            in_cohort: self.in_cohort(player),
        }
    }

    pub fn batting_rows(&self) -> Vec<BattingRow> {
        self.tables
            .batting
            .values()
            .map(|perf| self.batting_row(perf))
            .collect()
    }

    pub fn bowling_rows(&self) -> Vec<BowlingRow> {
        self.tables
            .bowling
            .values()
            .map(|perf| self.bowling_row(perf))
            .collect()
    }
}

pub fn batting_frame(rows: &[BattingRow]) -> Result<DataFrame> {
    use columns::*;

    let df = df!(
        ID => rows.iter().map(|r| r.id).collect::<Vec<_>>(),
        GAME_ID => rows.iter().map(|r| r.game_id).collect::<Vec<_>>(),
        INNINGS_ID => rows.iter().map(|r| r.innings_id).collect::<Vec<_>>(),
        PLAYER_ID => rows.iter().map(|r| r.player_id).collect::<Vec<_>>(),
        PLAYER => rows.iter().map(|r| r.player.as_deref()).collect::<Vec<_>>(),
        FORMAT_ID => rows.iter().map(|r| r.format_id).collect::<Vec<_>>(),
        RUNS => rows.iter().map(|r| r.runs).collect::<Vec<_>>(),
        BALLS => rows.iter().map(|r| r.balls).collect::<Vec<_>>(),
        FOURS => rows.iter().map(|r| r.fours).collect::<Vec<_>>(),
        SIXES => rows.iter().map(|r| r.sixes).collect::<Vec<_>>(),
        DISMISSAL => rows.iter().map(|r| r.dismissal.as_deref()).collect::<Vec<_>>(),
        OUT => rows.iter().map(|r| r.out).collect::<Vec<_>>(),
        IS_HOME => rows.iter().map(|r| r.is_home).collect::<Vec<_>>(),
        ON_TOUR => rows.iter().map(|r| r.on_tour).collect::<Vec<_>>(),
        IN_COHORT => rows.iter().map(|r| r.in_cohort).collect::<Vec<_>>()
    )?;
    Ok(df)
}

pub fn bowling_frame(rows: &[BowlingRow]) -> Result<DataFrame> {
    use columns::*;

    let df = df!(
        ID => rows.iter().map(|r| r.id).collect::<Vec<_>>(),
        GAME_ID => rows.iter().map(|r| r.game_id).collect::<Vec<_>>(),
        INNINGS_ID => rows.iter().map(|r| r.innings_id).collect::<Vec<_>>(),
        PLAYER_ID => rows.iter().map(|r| r.player_id).collect::<Vec<_>>(),
        PLAYER => rows.iter().map(|r| r.player.as_deref()).collect::<Vec<_>>(),
        FORMAT_ID => rows.iter().map(|r| r.format_id).collect::<Vec<_>>(),
        BALLS => rows.iter().map(|r| r.balls).collect::<Vec<_>>(),
        MAIDENS => rows.iter().map(|r| r.maidens).collect::<Vec<_>>(),
        RUNS => rows.iter().map(|r| r.runs).collect::<Vec<_>>(),
        WICKETS => rows.iter().map(|r| r.wickets).collect::<Vec<_>>(),
        IS_HOME => rows.iter().map(|r| r.is_home).collect::<Vec<_>>(),
        ON_TOUR => rows.iter().map(|r| r.on_tour).collect::<Vec<_>>(),
        IN_COHORT => rows.iter().map(|r| r.in_cohort).collect::<Vec<_>>()
    )?;
    Ok(df)
}

impl QuizFrames {
    pub fn from_rows(batting: &[BattingRow], bowling: &[BowlingRow]) -> Result<Self> {
        Ok(Self {
            batting: batting_frame(batting)?,
            bowling: bowling_frame(bowling)?,
        })
    }
}

/// Runs every lookup and derivation over both performance tables.
pub fn enrich(tables: &Tables, config: &EnrichmentConfig) -> Result<QuizFrames> {
    let enricher = Enricher::new(tables, config);
    let batting = enricher.batting_rows();
    let bowling = enricher.bowling_rows();
    info!(
        "Enriched {} batting and {} bowling performances",
        batting.len(),
        bowling.len()
    );
    QuizFrames::from_rows(&batting, &bowling)
}
