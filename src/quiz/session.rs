//! The question-and-answer loop.

use crate::config::ReportConfig;
use crate::enrich::QuizFrames;
use crate::error::Result;
use crate::quiz::plot::{ChartSink, HazardChart};
use crate::quiz::{queries, render};
use log::{debug, error};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Question (0 to quit): ";
pub const PLAYER_PROMPT: &str = "Which player? ";
pub const NOT_A_NUMBER: &str = "Error! This is not a number. Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    FormatAverages,
    Durability,
    UnclaimedScore,
    DistanceRun,
    NotOutRatio,
    /// Answered from memory rather than the data.
    Fixed(&'static str),
    RareAppearances,
    TourSplit,
    HazardCurve,
}

impl Question {
    pub fn from_number(n: i64) -> Option<Self> {
        Some(match n {
            1 => Self::FormatAverages,
            2 => Self::Durability,
            3 => Self::UnclaimedScore,
            4 => Self::DistanceRun,
            5 => Self::NotOutRatio,
            6 => Self::Fixed("Josh Lee with 27"),
            7 => Self::Fixed("Chris Shone of course"),
            8 => Self::RareAppearances,
            9 => Self::TourSplit,
            10 => Self::HazardCurve,
            _ => return None,
        })
    }
}

/// Reads one line, `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

pub struct Session<S> {
    frames: QuizFrames,
    report: ReportConfig,
    charts: S,
}

impl<S: ChartSink> Session<S> {
    pub fn new(frames: QuizFrames, report: ReportConfig, charts: S) -> Self {
        Self {
            frames,
            report,
            charts,
        }
    }

    pub fn charts(&self) -> &S {
        &self.charts
    }

    pub fn into_charts(self) -> S {
        self.charts
    }

    /// Prompts for question numbers until `0` or end of input.
    ///
    /// A question that fails is reported on `out` and the loop carries on.
    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = read_line(input)? else {
                writeln!(out)?;
                return Ok(());
            };
            match line.parse::<i64>() {
                Err(_) => writeln!(out, "{NOT_A_NUMBER}")?,
                Ok(0) => return Ok(()),
                Ok(n) => self.ask(n, input, out)?,
            }
        }
    }

    /// Answers question `n`; unknown numbers are ignored.
    pub fn ask(&mut self, n: i64, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        let Some(question) = Question::from_number(n) else {
            debug!("No question {n}");
            return Ok(());
        };
        if let Err(e) = self.answer(question, input, out) {
            error!("Question {n} failed: {e}");
            writeln!(out, "Couldn't answer question {n}: {e}")?;
        }
        Ok(())
    }

    pub fn answer(
        &mut self,
        question: Question,
        input: &mut impl BufRead,
        out: &mut impl Write,
    ) -> Result<()> {
        let QuizFrames { batting, bowling } = &self.frames;
        match question {
            Question::FormatAverages => {
                let format = self.report.format_id;
                writeln!(
                    out,
                    "The website is a bit cruel on some retirees so these numbers can be a little different:"
                )?;
                writeln!(out, "===BATTING===")?;
                let bat = queries::format_batting_averages(batting, format)?;
                write!(out, "{}", render::table(&bat)?)?;
                writeln!(out, "\n\n\n===BOWLING===")?;
                let bowl = queries::format_bowling_averages(bowling, format)?;
                write!(out, "{}", render::table(&bowl)?)?;
            }
            Question::Durability => {
                let df = queries::durable_batters(batting)?;
                write!(out, "{}", render::table(&df)?)?;
            }
            Question::UnclaimedScore => {
                let bat = queries::lowest_unrecorded_score(batting)?;
                writeln!(out, "Lowest batting score not recorded is {bat}.")?;
                let bowl = queries::lowest_unrecorded_score(bowling)?;
                writeln!(out, "Lowest bowling score not recorded is {bowl}.")?;
            }
            Question::DistanceRun => {
                let player = &self.report.featured_player;
                match queries::running_distance(batting, player, self.report.metres_per_run)? {
                    Some(d) => writeln!(out, "{} has had to run {:.2} km", d.player, d.kilometres)?,
                    None => writeln!(out, "{player} has no innings recorded")?,
                }
            }
            Question::NotOutRatio => {
                let df = queries::not_out_ratios(batting)?;
                write!(out, "{}", render::table(&df)?)?;
            }
            Question::Fixed(answer) => writeln!(out, "{answer}")?,
            Question::RareAppearances => {
                let names = queries::rare_appearances(batting)?;
                write!(out, "{}", render::lines(&names))?;
            }
            Question::TourSplit => {
                writeln!(out, "====BATTING====")?;
                write!(out, "{}", render::table(&queries::tour_batting(batting)?)?)?;
                writeln!(out, "\n\n====BOWLING====")?;
                write!(out, "{}", render::table(&queries::tour_bowling(bowling)?)?)?;
                writeln!(out, "\n\n====COMBINED====")?;
                let combined = queries::tour_combined(batting, bowling)?;
                write!(out, "{}", render::table(&combined)?)?;
            }
            Question::HazardCurve => {
                let sample = queries::hazard_sample(batting)?;
                write!(out, "{PLAYER_PROMPT}")?;
                out.flush()?;
                let player = read_line(input)?.unwrap_or_default();

                let overlay = if sample.contains_player(&player) {
                    Some(player.as_str())
                } else {
                    writeln!(out, "Couldn't find {player}. Choose one of the following:")?;
                    writeln!(out, "{}", sample.distinct_players().join(" "))?;
                    None
                };
                let chart = HazardChart::build(&sample, overlay, self.report.hazard_bandwidth)?;
                self.charts.show(&chart)?;
            }
        }
        Ok(())
    }
}
