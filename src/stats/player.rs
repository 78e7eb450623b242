//! Per-opponent / per-partner statistics
//!
//! Aggregates a pre-filtered group of records (one H2H subset) into win/loss
//! totals, set balance, the most recent game, streak and trend.

use serde::Serialize;

use super::score::parse_score;
use super::streak::{calculate_streak, StreakInfo};
use super::trend::{calculate_trend, TrendInfo, TrendMethod};
use super::percent;
use crate::MatchRecord;

/// Statistics for one group of matches
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    /// Games won
    pub wins: usize,
    /// Games not won (draws are folded in here)
    pub losses: usize,
    /// wins + losses
    pub total: usize,
    /// Rounded whole percent, 0 when there are no games
    pub win_rate: u32,
    /// Sets won across all parsed scores
    pub sets_won: u64,
    /// Sets lost across all parsed scores
    pub sets_lost: u64,
    /// sets_won - sets_lost
    pub set_balance: i64,
    /// Most recent game; the earliest-listed one wins a date tie
    pub last_game: Option<MatchRecord>,
    pub streak: StreakInfo,
    /// `None` when there are too few games for the trend method
    pub trend: Option<TrendInfo>,
}

/// Colour band used by ranking tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRateBand {
    High,
    Medium,
    Low,
}

impl PlayerStats {
    pub fn win_rate_band(&self) -> WinRateBand {
        if self.win_rate >= 60 {
            WinRateBand::High
        } else if self.win_rate <= 40 {
            WinRateBand::Low
        } else {
            WinRateBand::Medium
        }
    }

    /// Date of the most recent game
    pub fn last_played(&self) -> Option<chrono::NaiveDate> {
        self.last_game.as_ref().map(|g| g.date)
    }
}

/// Aggregate one group of records
pub fn calculate_player_stats(records: &[MatchRecord], trend_method: TrendMethod) -> PlayerStats {
    let mut stats = PlayerStats::default();
    let mut last_game: Option<&MatchRecord> = None;

    for record in records {
        if record.is_win() {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }

        let score = parse_score(record.score.as_deref());
        stats.sets_won += score.sets_won as u64;
        stats.sets_lost += score.sets_lost as u64;

        // Strictly later only, so the first record on the latest date is kept
        if last_game.map_or(true, |last| record.date > last.date) {
            last_game = Some(record);
        }
    }

    stats.total = stats.wins + stats.losses;
    stats.win_rate = percent(stats.wins, stats.total);
    stats.set_balance = stats.sets_won as i64 - stats.sets_lost as i64;
    stats.last_game = last_game.cloned();
    stats.streak = calculate_streak(records);
    stats.trend = calculate_trend(records, trend_method);

    log::debug!(
        "Stats over {} games: {}-{} ({}%), sets {}-{}",
        stats.total,
        stats.wins,
        stats.losses,
        stats.win_rate,
        stats.sets_won,
        stats.sets_lost
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::streak::StreakType;
    use crate::stats::test_support::{make_match, sequence};
    use crate::stats::trend::TrendDirection;
    use crate::MatchResult::*;

    #[test]
    fn test_empty_group() {
        let stats = calculate_player_stats(&[], TrendMethod::MidpointSplit);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.win_rate, 0);
        assert_eq!(stats.last_game, None);
        assert_eq!(stats.streak.streak_type, None);
        assert_eq!(stats.trend, None);
    }

    #[test]
    fn test_draws_fold_into_losses() {
        let records = sequence(&[Win, Draw, Loss, Win]);
        let stats = calculate_player_stats(&records, TrendMethod::MidpointSplit);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.total, records.len());
        assert_eq!(stats.win_rate, 50);
    }

    #[test]
    fn test_win_rate_rounding_and_bounds() {
        for results in [
            vec![Win],
            vec![Loss],
            vec![Win, Loss, Loss],
            vec![Win, Win, Loss],
            vec![Draw, Draw, Draw, Draw, Draw, Draw, Draw, Win],
        ] {
            let stats = calculate_player_stats(&sequence(&results), TrendMethod::LastThree);
            assert!(stats.win_rate <= 100);
            assert_eq!(stats.wins + stats.losses, results.len());
        }
        let one_in_three = calculate_player_stats(&sequence(&[Win, Loss, Loss]), TrendMethod::LastThree);
        assert_eq!(one_in_three.win_rate, 33);
        let two_in_three = calculate_player_stats(&sequence(&[Win, Win, Loss]), TrendMethod::LastThree);
        assert_eq!(two_in_three.win_rate, 67);
    }

    #[test]
    fn test_set_totals() {
        let records = vec![
            make_match(1, "2024-01-01", Win, Some("3-0 (11-5, 11-3, 11-7)")),
            make_match(2, "2024-01-08", Loss, Some("1-0 (1-3)")),
            make_match(3, "2024-01-15", Win, Some("2-1")),
            make_match(4, "2024-01-22", Loss, Some("not recorded")),
            make_match(5, "2024-01-29", Draw, None),
        ];
        let stats = calculate_player_stats(&records, TrendMethod::MidpointSplit);
        assert_eq!(stats.sets_won, 6);
        assert_eq!(stats.sets_lost, 4);
        assert_eq!(stats.set_balance, 2);
    }

    #[test]
    fn test_last_game_prefers_first_on_tie() {
        let records = vec![
            make_match(1, "2024-03-01", Loss, None),
            make_match(2, "2024-03-09", Win, None),
            make_match(3, "2024-03-09", Loss, None),
            make_match(4, "2024-02-01", Win, None),
        ];
        let stats = calculate_player_stats(&records, TrendMethod::MidpointSplit);
        assert_eq!(stats.last_game.unwrap().id.0, 2);
    }

    #[test]
    fn test_includes_streak_and_trend() {
        let records = sequence(&[Loss, Loss, Win, Win, Win]);
        let stats = calculate_player_stats(&records, TrendMethod::MidpointSplit);
        assert_eq!(stats.streak.current_streak, 3);
        assert_eq!(stats.streak.streak_type, Some(StreakType::Win));
        assert_eq!(stats.trend.unwrap().direction, TrendDirection::Up);
    }

    #[test]
    fn test_win_rate_band() {
        let band = |results: &[crate::MatchResult]| {
            calculate_player_stats(&sequence(results), TrendMethod::MidpointSplit).win_rate_band()
        };
        assert_eq!(band(&[Win, Win, Win, Loss, Loss]), WinRateBand::High);
        assert_eq!(band(&[Win, Loss]), WinRateBand::Medium);
        assert_eq!(band(&[Win, Win, Loss, Loss, Loss]), WinRateBand::Low);
    }
}
