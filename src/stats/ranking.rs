//! Ranking tables of opponents and partners

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::player::PlayerStats;

/// Row order for ranking tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Highest win rate first, then most games
    #[default]
    WinRate,
    /// Lowest win rate first, then most games
    Hardest,
    /// Most games first, then highest win rate
    MostPlayed,
    /// Most recent game first (never-played last), then most games
    RecentFirst,
    /// Best set balance first, then highest win rate
    BestBalance,
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOption::WinRate => write!(f, "win_rate"),
            SortOption::Hardest => write!(f, "hardest"),
            SortOption::MostPlayed => write!(f, "most_played"),
            SortOption::RecentFirst => write!(f, "recent_first"),
            SortOption::BestBalance => write!(f, "best_balance"),
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "winrate" => Ok(SortOption::WinRate),
            "hardest" => Ok(SortOption::Hardest),
            "mostplayed" => Ok(SortOption::MostPlayed),
            "recentfirst" | "recent" => Ok(SortOption::RecentFirst),
            "bestbalance" | "balance" => Ok(SortOption::BestBalance),
            _ => Err(format!(
                "Unknown sort: {}. Use win_rate, hardest, most_played, recent_first or best_balance.",
                s
            )),
        }
    }
}

/// One opponent or partner and their statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub name: String,
    pub stats: PlayerStats,
}

/// Stable sort, so rows that tie on both keys keep their order
pub fn sort_rows(rows: &mut [RankingRow], sort: SortOption) {
    rows.sort_by(|a, b| compare(&a.stats, &b.stats, sort));
}

fn compare(a: &PlayerStats, b: &PlayerStats, sort: SortOption) -> Ordering {
    match sort {
        SortOption::WinRate => b
            .win_rate
            .cmp(&a.win_rate)
            .then_with(|| b.total.cmp(&a.total)),
        SortOption::Hardest => a
            .win_rate
            .cmp(&b.win_rate)
            .then_with(|| b.total.cmp(&a.total)),
        SortOption::MostPlayed => b
            .total
            .cmp(&a.total)
            .then_with(|| b.win_rate.cmp(&a.win_rate)),
        SortOption::RecentFirst => b
            .last_played()
            .cmp(&a.last_played())
            .then_with(|| b.total.cmp(&a.total)),
        SortOption::BestBalance => b
            .set_balance
            .cmp(&a.set_balance)
            .then_with(|| b.win_rate.cmp(&a.win_rate)),
    }
}
