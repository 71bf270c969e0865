//! Typed records of the club's published data document.
//!
//! The website serves one JSON document shaped like
//! `{ "created": { "games": [...], "players": [...], ... } }`. Each
//! collection is a list of flat rows carrying a numeric `id`. Numbers are
//! accepted either as JSON numbers or as numeric strings, and `null`
//! counts as absent. Apart from `id`, a cell that doesn't hold the expected
//! type (a captain of `"TBC"`, say) is read as absent rather than failing
//! the document.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                lenient::u32_value(deserializer).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(GameId);
id_type!(InningsId);
id_type!(PlayerId);
id_type!(
    /// A club, ours or an opponent's
    TeamId
);
id_type!(FormatId);
id_type!(VenueId);
id_type!(BattingPerformanceId);
id_type!(BowlingPerformanceId);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Game {
    pub id: GameId,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub slug: Option<String>,
    #[serde(rename = "teamID", default, deserialize_with = "lenient::opt")]
    pub team_id: Option<TeamId>,
    #[serde(rename = "oppositionID", default, deserialize_with = "lenient::opt")]
    pub opposition_id: Option<TeamId>,
    #[serde(rename = "formatID", default, deserialize_with = "lenient::opt")]
    pub format_id: Option<FormatId>,
    #[serde(rename = "venueID", default, deserialize_with = "lenient::opt")]
    pub venue_id: Option<VenueId>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub result: Option<String>,
    #[serde(rename = "tosswonby", default, deserialize_with = "lenient::opt")]
    pub toss_won_by: Option<TeamId>,
    #[serde(rename = "tossdecision", default, deserialize_with = "lenient::opt_text")]
    pub toss_decision: Option<String>,
    #[serde(rename = "captainID", default, deserialize_with = "lenient::opt")]
    pub captain_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Innings {
    pub id: InningsId,
    #[serde(rename = "gameID", default, deserialize_with = "lenient::opt")]
    pub game_id: Option<GameId>,
    /// The batting side
    #[serde(rename = "teamID", default, deserialize_with = "lenient::opt")]
    pub team_id: Option<TeamId>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub innings_no: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub runs: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub wickets: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub overs: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub extras_noballs: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub extras_wides: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub extras_byes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub extras_legbyes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub extras_pens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BattingPerformance {
    pub id: BattingPerformanceId,
    #[serde(rename = "gameID", default, deserialize_with = "lenient::opt")]
    pub game_id: Option<GameId>,
    #[serde(rename = "inningsID", default, deserialize_with = "lenient::opt")]
    pub innings_id: Option<InningsId>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub batnumber: Option<u32>,
    #[serde(rename = "playerID", default, deserialize_with = "lenient::opt")]
    pub player_id: Option<PlayerId>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub runs: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub balls: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub fours: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub sixes: Option<u32>,
    /// Free text such as "Bowled", "Not out", "Retired hurt"
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub dismissal: Option<String>,
    #[serde(rename = "bowlerID", default, deserialize_with = "lenient::opt")]
    pub bowler_id: Option<PlayerId>,
    #[serde(rename = "fielderID", default, deserialize_with = "lenient::opt")]
    pub fielder_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BowlingPerformance {
    pub id: BowlingPerformanceId,
    #[serde(rename = "gameID", default, deserialize_with = "lenient::opt")]
    pub game_id: Option<GameId>,
    /// The innings bowled at, i.e. the opponents' batting innings
    #[serde(rename = "inningsID", default, deserialize_with = "lenient::opt")]
    pub innings_id: Option<InningsId>,
    #[serde(rename = "playerID", default, deserialize_with = "lenient::opt")]
    pub player_id: Option<PlayerId>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub balls: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub maidens: Option<u32>,
    /// Runs conceded
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub runs: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub wickets: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub wides: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub noballs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub shortname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Format {
    pub id: FormatId,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub innings: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub country: Option<String>,
}

/// The named collections inside `created`. Absent collections are empty.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub games: Vec<Game>,
    pub formats: Vec<Format>,
    pub venues: Vec<Venue>,
    pub players: Vec<Player>,
    pub innings: Vec<Innings>,
    pub teams: Vec<Team>,
    #[serde(rename = "battingPerformances")]
    pub batting_performances: Vec<BattingPerformance>,
    #[serde(rename = "bowlingPerformances")]
    pub bowling_performances: Vec<BowlingPerformance>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SourceDocument {
    pub created: Collections,
}

/// Row types that carry their own identifier.
pub trait Keyed {
    type Id: Ord + Copy + fmt::Display;

    fn key(&self) -> Self::Id;
}

macro_rules! keyed {
    ($($record:ty => $id:ty),* $(,)?) => {
        $(impl Keyed for $record {
            type Id = $id;

            fn key(&self) -> $id {
                self.id
            }
        })*
    };
}

keyed! {
    Game => GameId,
    Innings => InningsId,
    BattingPerformance => BattingPerformanceId,
    BowlingPerformance => BowlingPerformanceId,
    Player => PlayerId,
    Team => TeamId,
    Format => FormatId,
    Venue => VenueId,
}

/// Deserializers that accept numbers written as strings and treat `null`
/// as absent.
///
/// Only row identifiers are strict. Any other cell that can't be read as
/// the expected type comes out as `None` and is logged at debug level.
pub(crate) mod lenient {
    use log::debug;
    use serde::de::{Error as _, IgnoredAny};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Unsigned(u64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    impl Cell {
        fn to_f64(&self) -> Option<f64> {
            match self {
                Self::Unsigned(v) => Some(*v as f64),
                Self::Float(v) => Some(*v),
                Self::Text(s) if s.trim().is_empty() => None,
                Self::Text(s) => s.trim().parse().ok().or_else(|| {
                    debug!("Ignoring non-numeric value {s:?}");
                    None
                }),
                Self::Other(_) => {
                    debug!("Ignoring a value that isn't a number");
                    None
                }
            }
        }

        fn to_u32(&self) -> Option<u32> {
            let value = match self {
                Self::Unsigned(v) => u32::try_from(*v).ok(),
                Self::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX) => {
                    Some(*v as u32)
                }
                Self::Text(s) if s.trim().is_empty() => return None,
                Self::Text(s) => s.trim().parse().ok(),
                Self::Float(_) | Self::Other(_) => None,
            };
            if value.is_none() {
                debug!("Ignoring a value that isn't a whole number: {}", self.describe());
            }
            value
        }

        fn to_text(self) -> Option<String> {
            match self {
                Self::Text(s) => Some(s),
                Self::Unsigned(v) => Some(v.to_string()),
                Self::Float(v) => Some(v.to_string()),
                Self::Other(_) => {
                    debug!("Ignoring a value that isn't text");
                    None
                }
            }
        }

        fn describe(&self) -> String {
            match self {
                Self::Unsigned(v) => v.to_string(),
                Self::Float(v) => v.to_string(),
                Self::Text(s) => format!("{s:?}"),
                Self::Other(_) => "(not a scalar)".to_owned(),
            }
        }
    }

    /// A row identifier; anything but a whole number fails the row.
    pub fn u32_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let cell = Cell::deserialize(deserializer)?;
        cell.to_u32().ok_or_else(|| {
            D::Error::custom(format!("expected a whole-number id, got {}", cell.describe()))
        })
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<Cell>::deserialize(deserializer)?.and_then(|c| c.to_u32()))
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Cell>::deserialize(deserializer)?.and_then(|c| c.to_f64()))
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<Cell>::deserialize(deserializer)?.and_then(Cell::to_text))
    }

    /// Optional identifier; `null`, missing, `""` and junk are all absent.
    pub fn opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<u32>,
    {
        Ok(opt_u32(deserializer)?.map(T::from))
    }
}

macro_rules! from_u32 {
    ($($name:ident),*) => {
        $(impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        })*
    };
}

from_u32!(GameId, InningsId, PlayerId, TeamId, FormatId, VenueId);
