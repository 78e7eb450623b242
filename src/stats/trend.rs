//! Form trend classification
//!
//! Two classifiers are available. `MidpointSplit` compares the win rate of
//! the newer half of the games against the older half; `LastThree` looks at
//! the three most recent games only. An engine uses one of them for every
//! group it evaluates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{newest_first, percent};
use crate::MatchRecord;

/// Win-rate swing (percentage points) needed to call a midpoint trend
pub const TREND_THRESHOLD: i32 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMethod {
    #[default]
    MidpointSplit,
    LastThree,
}

impl TrendMethod {
    /// Fewest records the method will classify
    pub fn min_records(&self) -> usize {
        match self {
            TrendMethod::MidpointSplit => 4,
            TrendMethod::LastThree => 3,
        }
    }
}

impl fmt::Display for TrendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendMethod::MidpointSplit => write!(f, "midpoint_split"),
            TrendMethod::LastThree => write!(f, "last_three"),
        }
    }
}

impl FromStr for TrendMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "midpoint_split" | "midpoint" => Ok(TrendMethod::MidpointSplit),
            "last_three" | "last3" => Ok(TrendMethod::LastThree),
            _ => Err(format!(
                "Unknown trend method: {}. Use midpoint_split or last_three.",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Figures the direction was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TrendBasis {
    MidpointSplit {
        recent_win_rate: u32,
        older_win_rate: u32,
        /// recent minus older, in percentage points
        difference: i32,
    },
    LastThree {
        wins: usize,
        last_game_won: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendInfo {
    pub direction: TrendDirection,
    pub basis: TrendBasis,
}

/// Classify the trend of a group; `None` below the method's minimum
pub fn calculate_trend(records: &[MatchRecord], method: TrendMethod) -> Option<TrendInfo> {
    if records.len() < method.min_records() {
        return None;
    }

    let sorted = newest_first(records);
    Some(match method {
        TrendMethod::MidpointSplit => midpoint_split(&sorted),
        TrendMethod::LastThree => last_three(&sorted),
    })
}

fn midpoint_split(newest_first: &[&MatchRecord]) -> TrendInfo {
    let midpoint = newest_first.len() / 2;
    let (recent, older) = newest_first.split_at(midpoint);

    let wins = |games: &[&MatchRecord]| games.iter().filter(|r| r.is_win()).count();
    let recent_win_rate = percent(wins(recent), recent.len());
    let older_win_rate = percent(wins(older), older.len());
    let difference = recent_win_rate as i32 - older_win_rate as i32;

    let direction = if difference >= TREND_THRESHOLD {
        TrendDirection::Up
    } else if difference <= -TREND_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    TrendInfo {
        direction,
        basis: TrendBasis::MidpointSplit {
            recent_win_rate,
            older_win_rate,
            difference,
        },
    }
}

fn last_three(newest_first: &[&MatchRecord]) -> TrendInfo {
    let last3 = &newest_first[..3];
    let wins = last3.iter().filter(|r| r.is_win()).count();
    let last_game_won = last3[0].is_win();

    let direction = match (wins, last_game_won) {
        (3, _) | (2, true) => TrendDirection::Up,
        (2, false) | (1, true) => TrendDirection::Stable,
        _ => TrendDirection::Down,
    };

    TrendInfo {
        direction,
        basis: TrendBasis::LastThree {
            wins,
            last_game_won,
        },
    }
}
