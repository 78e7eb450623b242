//! Match statistics engine
//!
//! Pure computations over a snapshot of match records. Nothing here keeps
//! state between calls or mutates its input.

pub mod engine;
pub mod player;
pub mod ranking;
pub mod regression;
pub mod score;
pub mod series;
pub mod streak;
pub mod summary;
pub mod trend;

pub use engine::{HeadToHead, MatchStatsEngine};
pub use player::{calculate_player_stats, PlayerStats};
pub use ranking::{RankingRow, SortOption};
pub use regression::{linear_regression, RegressionLine};
pub use score::{parse_score, ScoreConsistency, ScoreSummary, SetScore, SetTally};
pub use series::{
    day_of_week, set_balance_series, streak_series, weekly_frequency, win_rate_evolution,
};
pub use streak::{calculate_streak, StreakInfo, StreakType};
pub use summary::{summarize, summarize_sport, OverallSummary, SportSummary};
pub use trend::{calculate_trend, TrendDirection, TrendInfo, TrendMethod};

use crate::MatchRecord;

/// Records most recent first; equal dates keep their input order
pub(crate) fn newest_first(records: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut sorted: Vec<&MatchRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Records oldest first; equal dates keep their input order
pub(crate) fn oldest_first(records: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut sorted: Vec<&MatchRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    sorted
}

/// Whole-number percentage, rounded half up (0 when `whole` is 0)
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{GameFormat, MatchId, MatchRecord, MatchResult, Sport};
    use chrono::NaiveDate;

    pub fn make_match(id: i64, date: &str, result: MatchResult, score: Option<&str>) -> MatchRecord {
        MatchRecord {
            id: MatchId(id),
            sport: Sport::TableTennis,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            result,
            opponent: "Ana".to_string(),
            format: GameFormat::Singles,
            score: score.map(str::to_string),
            detailed_score: None,
            location: None,
            notes: None,
        }
    }

    /// One match per day starting 2024-01-01, oldest first
    pub fn sequence(results: &[MatchResult]) -> Vec<MatchRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let date = start + chrono::Duration::days(i as i64);
                make_match(i as i64 + 1, &date.format("%Y-%m-%d").to_string(), *result, None)
            })
            .collect()
    }
}
