//! Selecting and grouping match records
//!
//! Filters narrow a snapshot by sport, game type, result or period. Grouping
//! turns a snapshot into the per-opponent and per-partner subsets that the
//! statistics engine evaluates.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{GameType, MatchRecord, MatchResult, Sport};

/// Earliest date kept by a "last N days" period
pub fn period_cutoff(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(days as i64)
}

/// Record predicate; unset fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub sport: Option<Sport>,
    pub game_type: Option<GameType>,
    pub result: Option<MatchResult>,
    /// Keep games on or after this date
    pub since: Option<NaiveDate>,
}

impl MatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sport(mut self, sport: Sport) -> Self {
        self.sport = Some(sport);
        self
    }

    pub fn game_type(mut self, game_type: GameType) -> Self {
        self.game_type = Some(game_type);
        self
    }

    pub fn result(mut self, result: MatchResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    /// Keep the last `days` days counted back from `today`
    pub fn within_days(self, today: NaiveDate, days: u32) -> Self {
        self.since(period_cutoff(today, days))
    }

    pub fn matches(&self, record: &MatchRecord) -> bool {
        self.sport.map_or(true, |s| record.sport == s)
            && self.game_type.map_or(true, |t| record.game_type() == t)
            && self.result.map_or(true, |r| record.result == r)
            && self.since.map_or(true, |d| record.date >= d)
    }

    /// Matching records in their original order
    pub fn apply(&self, records: &[MatchRecord]) -> Vec<MatchRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Which side of the net a named player was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Opponent,
    Partner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Opponent => write!(f, "opponent"),
            Role::Partner => write!(f, "partner"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opponent" | "vs" => Ok(Role::Opponent),
            "partner" | "with" => Ok(Role::Partner),
            _ => Err(format!("Unknown role: {}. Use opponent or partner.", s)),
        }
    }
}

pub type Groups = BTreeMap<String, Vec<MatchRecord>>;

/// Singles games keyed by opponent
pub fn group_by_opponent(records: &[MatchRecord]) -> Groups {
    let mut groups = Groups::new();
    for record in records.iter().filter(|r| r.game_type() == GameType::Singles) {
        groups
            .entry(record.opponent.clone())
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Doubles games keyed by partner; games without a partner are left out
pub fn group_by_partner(records: &[MatchRecord]) -> Groups {
    let mut groups = Groups::new();
    for record in records.iter().filter(|r| r.game_type() == GameType::Doubles) {
        if let Some(partner) = record.partner() {
            groups
                .entry(partner.to_string())
                .or_default()
                .push(record.clone());
        }
    }
    groups
}

/// Doubles games keyed by each opponent
///
/// A pair with the same name twice on the other side counts the game once.
pub fn group_by_doubles_opponent(records: &[MatchRecord]) -> Groups {
    let mut groups = Groups::new();
    for record in records.iter().filter(|r| r.game_type() == GameType::Doubles) {
        let mut names = record.opponents();
        names.dedup();
        for name in names {
            groups
                .entry(name.to_string())
                .or_default()
                .push(record.clone());
        }
    }
    groups
}

/// Grouping for a game type and role; singles have no partner, so the role
/// is ignored there
pub fn group_for(records: &[MatchRecord], game_type: GameType, role: Role) -> Groups {
    match (game_type, role) {
        (GameType::Singles, _) => group_by_opponent(records),
        (GameType::Doubles, Role::Opponent) => group_by_doubles_opponent(records),
        (GameType::Doubles, Role::Partner) => group_by_partner(records),
    }
}
