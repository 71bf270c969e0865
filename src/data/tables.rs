use super::model::{
    BattingPerformance, BattingPerformanceId, BowlingPerformance, BowlingPerformanceId,
    Collections, Format, FormatId, Game, GameId, Innings, InningsId, Keyed, Player, PlayerId,
    SourceDocument, Team, TeamId, Venue, VenueId,
};
use log::warn;
use std::collections::BTreeMap;

/// One ordered table per collection, keyed by the row's identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tables {
    pub games: BTreeMap<GameId, Game>,
    pub formats: BTreeMap<FormatId, Format>,
    pub venues: BTreeMap<VenueId, Venue>,
    pub players: BTreeMap<PlayerId, Player>,
    pub innings: BTreeMap<InningsId, Innings>,
    pub teams: BTreeMap<TeamId, Team>,
    pub batting: BTreeMap<BattingPerformanceId, BattingPerformance>,
    pub bowling: BTreeMap<BowlingPerformanceId, BowlingPerformance>,
}

/// Indexes rows by identifier. A repeated identifier keeps the later row.
pub fn index_rows<R: Keyed>(collection: &str, rows: Vec<R>) -> BTreeMap<R::Id, R> {
    let mut table = BTreeMap::new();
    for row in rows {
        let key = row.key();
        if table.insert(key, row).is_some() {
            warn!("Duplicate id {key} in {collection}; keeping the later row");
        }
    }
    table
}

impl From<SourceDocument> for Tables {
    fn from(doc: SourceDocument) -> Self {
        let Collections {
            games,
            formats,
            venues,
            players,
            innings,
            teams,
            batting_performances,
            bowling_performances,
        } = doc.created;

        Self {
            games: index_rows("games", games),
            formats: index_rows("formats", formats),
            venues: index_rows("venues", venues),
            players: index_rows("players", players),
            innings: index_rows("innings", innings),
            teams: index_rows("teams", teams),
            batting: index_rows("battingPerformances", batting_performances),
            bowling: index_rows("bowlingPerformances", bowling_performances),
        }
    }
}

impl Tables {
    pub fn player_slug(&self, id: Option<PlayerId>) -> Option<&str> {
        self.players.get(&id?)?.slug.as_deref()
    }

    pub fn game(&self, id: Option<GameId>) -> Option<&Game> {
        self.games.get(&id?)
    }

    pub fn game_format(&self, id: Option<GameId>) -> Option<FormatId> {
        self.game(id)?.format_id
    }

    pub fn game_opposition(&self, id: Option<GameId>) -> Option<TeamId> {
        self.game(id)?.opposition_id
    }

    /// The side batting in an innings.
    pub fn innings_team(&self, id: Option<InningsId>) -> Option<TeamId> {
        self.innings.get(&id?)?.team_id
    }

    pub fn row_counts(&self) -> [(&'static str, usize); 8] {
        [
            ("games", self.games.len()),
            ("formats", self.formats.len()),
            ("venues", self.venues.len()),
            ("players", self.players.len()),
            ("innings", self.innings.len()),
            ("teams", self.teams.len()),
            ("battingPerformances", self.batting.len()),
            ("bowlingPerformances", self.bowling.len()),
        ]
    }
}
