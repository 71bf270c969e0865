//! The quiz questions as read-only polars plans over the enriched frames.
//!
//! Unless a question says otherwise it only looks at home-club rows
//! (`is_home`), and anything grouped by player drops rows whose player
//! couldn't be resolved. Averages are plain float division: a player who
//! was never out averages `inf`, and only the tour comparison filters such
//! rows away.

use crate::enrich::columns::{
    DISMISSAL, FORMAT_ID, FOURS, IN_COHORT, IS_HOME, ON_TOUR, OUT, PLAYER, RUNS, SIXES, WICKETS,
};
use crate::enrich::{DID_NOT_BAT, NOT_OUT};
use crate::error::Result;
use polars::prelude::*;
use std::collections::BTreeSet;

pub const AVE: &str = "ave";
pub const INNINGS: &str = "innings";
pub const NOT_OUTS: &str = "not_outs";
pub const RATIO: &str = "ratio";
pub const RATIO_BAT: &str = "ratio_bat";
pub const RATIO_BOWL: &str = "ratio_bowl";
pub const OVERALL: &str = "overall";

/// Durability lists batters with more innings than this.
pub const DURABLE_INNINGS: i64 = 99;
/// Not-out ratios only for batters with more innings than this.
pub const NOT_OUT_MIN_INNINGS: i64 = 29;
/// Exact innings count for the rare appearances list.
pub const RARE_INNINGS: i64 = 2;
/// Tour splits need more home outs (or wickets) than this.
pub const TOUR_MIN_HOME: i64 = 4;
/// The combined split needs more than this of both.
pub const COMBINED_MIN_HOME: i64 = 5;

const ABROAD: &str = "abroad";
const HOME: &str = "home";

fn suffixed(name: &str, side: &str) -> String {
    format!("{name}_{side}")
}

fn ratio(numerator: &str, denominator: &str) -> Expr {
    col(numerator).cast(DataType::Float64) / col(denominator).cast(DataType::Float64)
}

fn named() -> Expr {
    col(PLAYER).is_not_null()
}

/// Excludes "Did not bat" while keeping rows with no dismissal recorded.
fn batted() -> Expr {
    col(DISMISSAL).neq_missing(lit(DID_NOT_BAT))
}

fn innings_count() -> Expr {
    len().cast(DataType::Int64).alias(INNINGS)
}

fn all_finite(names: &[&str]) -> Expr {
    names
        .iter()
        .map(|name| col(*name).is_finite())
        .reduce(Expr::and)
        .unwrap_or_else(|| lit(true))
}

/// Sorts on `by`, breaking ties by player name so output is stable.
fn rank(lf: LazyFrame, by: &str, descending: bool) -> LazyFrame {
    lf.sort(
        [by, PLAYER],
        SortMultipleOptions::default()
            .with_order_descending_multi([descending, false])
            .with_nulls_last(true),
    )
}

fn home_players(df: &DataFrame) -> LazyFrame {
    df.clone().lazy().filter(col(IS_HOME).and(named()))
}

/// Q1 batting: cohort averages in one format, best first.
pub fn format_batting_averages(batting: &DataFrame, format_id: u32) -> Result<DataFrame> {
    let lf = home_players(batting)
        .filter(
            col(IN_COHORT)
                .and(col(FORMAT_ID).eq(lit(format_id)))
                .and(batted()),
        )
        .group_by([col(PLAYER)])
        .agg([col(RUNS).sum(), col(OUT).sum()])
        .with_column(ratio(RUNS, OUT).alias(AVE))
        .select([col(PLAYER), col(RUNS), col(OUT), col(AVE)]);
    Ok(rank(lf, AVE, true).collect()?)
}

/// Q1 bowling: cohort runs per wicket in one format, best (lowest) first.
pub fn format_bowling_averages(bowling: &DataFrame, format_id: u32) -> Result<DataFrame> {
    let lf = home_players(bowling)
        .filter(col(IN_COHORT).and(col(FORMAT_ID).eq(lit(format_id))))
        .group_by([col(PLAYER)])
        .agg([col(RUNS).sum(), col(WICKETS).sum()])
        .with_column(ratio(RUNS, WICKETS).alias(AVE))
        .select([col(PLAYER), col(RUNS), col(WICKETS), col(AVE)]);
    Ok(rank(lf, AVE, false).collect()?)
}

/// Q2: batters with more than [`DURABLE_INNINGS`] innings.
pub fn durable_batters(batting: &DataFrame) -> Result<DataFrame> {
    let lf = home_players(batting)
        .filter(batted())
        .group_by([col(PLAYER)])
        .agg([innings_count()])
        .filter(col(INNINGS).gt(lit(DURABLE_INNINGS)));
    Ok(rank(lf, INNINGS, true).collect()?)
}

/// Smallest non-negative integer missing from `values`.
pub fn lowest_unrecorded(values: impl IntoIterator<Item = i64>) -> i64 {
    let seen: BTreeSet<i64> = values.into_iter().collect();
    let mut n = 0;
    while seen.contains(&n) {
        n += 1;
    }
    n
}

/// Q3: lowest run value never recorded on the home side of `df`.
///
/// Works for both frames: batting runs scored or bowling runs conceded.
pub fn lowest_unrecorded_score(df: &DataFrame) -> Result<i64> {
    let home = df
        .clone()
        .lazy()
        .filter(col(IS_HOME))
        .select([col(RUNS)])
        .collect()?;
    let runs = home.column(RUNS)?.as_materialized_series().i64()?;
    Ok(lowest_unrecorded(runs.into_iter().flatten()))
}

/// Q4 totals for one batter.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningDistance {
    pub player: String,
    pub innings: i64,
    pub runs: i64,
    pub fours: i64,
    pub sixes: i64,
    pub kilometres: f64,
}

/// Runs that had to be run rather than hit to the boundary.
pub fn runs_run(runs: i64, fours: i64, sixes: i64) -> i64 {
    runs - 4 * fours - 6 * sixes
}

pub fn kilometres_run(runs_run: i64, metres_per_run: f64) -> f64 {
    runs_run as f64 * metres_per_run / 1000.0
}

fn first_i64(df: &DataFrame, name: &str) -> Result<i64> {
    let value = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?
        .i64()?
        .get(0);
    Ok(value.unwrap_or(0))
}

/// Q4: how far `player` has run between the wickets, `None` if they have
/// no home innings.
pub fn running_distance(
    batting: &DataFrame,
    player: &str,
    metres_per_run: f64,
) -> Result<Option<RunningDistance>> {
    let totals = batting
        .clone()
        .lazy()
        .filter(col(IS_HOME).and(col(PLAYER).eq(lit(player))))
        .select([
            innings_count(),
            col(RUNS).sum(),
            col(FOURS).sum(),
            col(SIXES).sum(),
        ])
        .collect()?;

    let innings = first_i64(&totals, INNINGS)?;
    if innings == 0 {
        return Ok(None);
    }
    let runs = first_i64(&totals, RUNS)?;
    let fours = first_i64(&totals, FOURS)?;
    let sixes = first_i64(&totals, SIXES)?;
    Ok(Some(RunningDistance {
        player: player.to_owned(),
        innings,
        runs,
        fours,
        sixes,
        kilometres: kilometres_run(runs_run(runs, fours, sixes), metres_per_run),
    }))
}

/// Q5: share of innings ending "Not out" for regular batters.
///
/// Every home row counts as an innings here, "Did not bat" included.
pub fn not_out_ratios(batting: &DataFrame) -> Result<DataFrame> {
    let home = home_players(batting);
    let innings = home
        .clone()
        .group_by([col(PLAYER)])
        .agg([innings_count()]);
    let not_outs = home
        .filter(col(DISMISSAL).eq(lit(NOT_OUT)))
        .group_by([col(PLAYER)])
        .agg([len().cast(DataType::Int64).alias(NOT_OUTS)]);

    let lf = innings
        .join(
            not_outs,
            [col(PLAYER)],
            [col(PLAYER)],
            JoinArgs::new(JoinType::Left),
        )
        .filter(col(INNINGS).gt(lit(NOT_OUT_MIN_INNINGS)))
        .with_column(ratio(NOT_OUTS, INNINGS).alias(RATIO))
        .select([col(PLAYER), col(INNINGS), col(NOT_OUTS), col(RATIO)]);
    Ok(rank(lf, RATIO, true).collect()?)
}

/// Q8: players with exactly [`RARE_INNINGS`] home rows, alphabetically.
pub fn rare_appearances(batting: &DataFrame) -> Result<Vec<String>> {
    let df = home_players(batting)
        .group_by([col(PLAYER)])
        .agg([innings_count()])
        .filter(col(INNINGS).eq(lit(RARE_INNINGS)))
        .sort([PLAYER], SortMultipleOptions::default())
        .collect()?;
    let names = df.column(PLAYER)?.as_materialized_series().str()?;
    Ok(names.into_iter().flatten().map(str::to_owned).collect())
}

/// Per-player runs, `count` and average on one side of the tour split.
fn side_totals(lf: LazyFrame, count: &str, side: &str) -> LazyFrame {
    let runs = suffixed(RUNS, side);
    let counted = suffixed(count, side);
    lf.group_by([col(PLAYER)])
        .agg([
            col(RUNS).sum().alias(runs.as_str()),
            col(count).sum().alias(counted.as_str()),
        ])
        .with_column(ratio(&runs, &counted).alias(suffixed(AVE, side)))
}

/// Abroad and home averages side by side with their ratio; unfiltered.
///
/// Only the club's own rows are read, so opponents' performances never
/// enter either average. `count` is the divisor: outs for batting, wickets for bowling.
fn tour_split(df: &DataFrame, count: &str) -> LazyFrame {
    let home = home_players(df);
    let abroad = side_totals(home.clone().filter(col(ON_TOUR)), count, ABROAD);
    let at_home = side_totals(home.filter(col(ON_TOUR).not()), count, HOME);
    abroad
        .join(
            at_home,
            [col(PLAYER)],
            [col(PLAYER)],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(ratio(&suffixed(AVE, ABROAD), &suffixed(AVE, HOME)).alias(RATIO))
}

fn tour_table(df: &DataFrame, count: &str, descending: bool) -> Result<DataFrame> {
    let ave_abroad = suffixed(AVE, ABROAD);
    let ave_home = suffixed(AVE, HOME);
    let counted_home = suffixed(count, HOME);
    let lf = tour_split(df, count)
        .filter(
            col(counted_home.as_str())
                .gt(lit(TOUR_MIN_HOME))
                .and(all_finite(&[ave_abroad.as_str(), ave_home.as_str(), RATIO])),
        )
        .select([
            col(PLAYER),
            col(suffixed(RUNS, ABROAD).as_str()),
            col(suffixed(count, ABROAD).as_str()),
            col(ave_abroad.as_str()),
            col(suffixed(RUNS, HOME).as_str()),
            col(counted_home.as_str()),
            col(ave_home.as_str()),
            col(RATIO),
        ]);
    Ok(rank(lf, RATIO, descending).collect()?)
}

/// Q9 batting: touring average over home average, tourists first.
///
/// Considers home-club innings only, on tour and off.
pub fn tour_batting(batting: &DataFrame) -> Result<DataFrame> {
    tour_table(batting, OUT, true)
}

/// Q9 bowling: touring average over home average, lowest first.
///
/// Considers home-club bowling only, on tour and off.
pub fn tour_bowling(bowling: &DataFrame) -> Result<DataFrame> {
    tour_table(bowling, WICKETS, false)
}

/// Q9 combined: batting ratio over bowling ratio for all-rounders.
pub fn tour_combined(batting: &DataFrame, bowling: &DataFrame) -> Result<DataFrame> {
    let out_home = suffixed(OUT, HOME);
    let wickets_home = suffixed(WICKETS, HOME);
    let bat = tour_split(batting, OUT).select([
        col(PLAYER),
        col(out_home.as_str()),
        col(RATIO).alias(RATIO_BAT),
    ]);
    let bowl = tour_split(bowling, WICKETS).select([
        col(PLAYER),
        col(wickets_home.as_str()),
        col(RATIO).alias(RATIO_BOWL),
    ]);

    let lf = bat
        .join(
            bowl,
            [col(PLAYER)],
            [col(PLAYER)],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(ratio(RATIO_BAT, RATIO_BOWL).alias(OVERALL))
        .filter(
            col(wickets_home.as_str())
                .gt(lit(COMBINED_MIN_HOME))
                .and(col(out_home.as_str()).gt(lit(COMBINED_MIN_HOME)))
                .and(all_finite(&[RATIO_BAT, RATIO_BOWL, OVERALL])),
        )
        .select([col(PLAYER), col(RATIO_BAT), col(RATIO_BOWL), col(OVERALL)]);
    Ok(rank(lf, OVERALL, true).collect()?)
}

/// Q10 input: one row per home innings actually batted.
///
/// Innings without a resolvable player still count towards the club-wide
/// curve; they just never match a name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazardSample {
    pub players: Vec<Option<String>>,
    pub runs: Vec<f64>,
    pub out: Vec<bool>,
}

impl HazardSample {
    fn named_players(&self) -> impl Iterator<Item = &str> {
        self.players.iter().flatten().map(String::as_str)
    }

    /// Distinct players in order of first appearance.
    pub fn distinct_players(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.named_players().filter(|p| seen.insert(*p)).collect()
    }

    pub fn contains_player(&self, player: &str) -> bool {
        self.named_players().any(|p| p == player)
    }

    /// (runs, out) pairs for one player.
    pub fn for_player(&self, player: &str) -> (Vec<f64>, Vec<bool>) {
        self.players
            .iter()
            .zip(self.runs.iter().zip(&self.out))
            .filter(|(p, _)| p.as_deref() == Some(player))
            .map(|(_, (runs, out))| (*runs, *out))
            .unzip()
    }
}

pub fn hazard_sample(batting: &DataFrame) -> Result<HazardSample> {
    let df = batting
        .clone()
        .lazy()
        .filter(col(IS_HOME).and(batted()).and(col(RUNS).is_not_null()))
        .select([col(PLAYER), col(RUNS), col(OUT)])
        .collect()?;

    let players = df.column(PLAYER)?.as_materialized_series().str()?;
    let runs = df.column(RUNS)?.as_materialized_series().i64()?;
    let out = df.column(OUT)?.as_materialized_series().i64()?;

    let mut sample = HazardSample::default();
    for ((player, runs), out) in players.into_iter().zip(runs).zip(out) {
        if let Some(runs) = runs {
            sample.players.push(player.map(str::to_owned));
            sample.runs.push(runs as f64);
            sample.out.push(out.unwrap_or(0) != 0);
        }
    }
    Ok(sample)
}
