//! Winning and losing streaks
//!
//! Walks the records most recent first. A draw breaks a winning streak and
//! extends a losing one.

use serde::{Deserialize, Serialize};

use super::newest_first;
use crate::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakType {
    Win,
    Loss,
}

/// Current run plus distance to the last win and last non-win
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakInfo {
    pub current_streak: usize,
    /// `None` only when there are no records
    pub streak_type: Option<StreakType>,
    /// Non-wins played since the most recent win
    pub games_since_last_win: usize,
    /// Wins played since the most recent non-win
    pub games_since_last_loss: usize,
}

/// Compute streak info for a group of records
pub fn calculate_streak(records: &[MatchRecord]) -> StreakInfo {
    let sorted = newest_first(records);
    let Some(latest) = sorted.first() else {
        return StreakInfo::default();
    };

    let streak_type = if latest.is_win() {
        StreakType::Win
    } else {
        StreakType::Loss
    };
    let current_streak = sorted
        .iter()
        .take_while(|r| r.is_win() == (streak_type == StreakType::Win))
        .count();

    let mut games_since_last_win = 0;
    let mut games_since_last_loss = 0;
    let mut found_win = false;
    let mut found_loss = false;

    for record in &sorted {
        if !found_win {
            if record.is_win() {
                found_win = true;
            } else {
                games_since_last_win += 1;
            }
        }
        if !found_loss {
            if !record.is_win() {
                found_loss = true;
            } else {
                games_since_last_loss += 1;
            }
        }
        if found_win && found_loss {
            break;
        }
    }

    StreakInfo {
        current_streak,
        streak_type: Some(streak_type),
        games_since_last_win,
        games_since_last_loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::{make_match, sequence};
    use crate::MatchResult::*;

    #[test]
    fn test_empty() {
        assert_eq!(calculate_streak(&[]), StreakInfo::default());
        assert_eq!(calculate_streak(&[]).streak_type, None);
    }

    #[test]
    fn test_single_record() {
        let win = calculate_streak(&sequence(&[Win]));
        assert_eq!(win.current_streak, 1);
        assert_eq!(win.streak_type, Some(StreakType::Win));
        assert_eq!(win.games_since_last_win, 0);
        assert_eq!(win.games_since_last_loss, 1);

        let draw = calculate_streak(&sequence(&[Draw]));
        assert_eq!(draw.current_streak, 1);
        assert_eq!(draw.streak_type, Some(StreakType::Loss));
        assert_eq!(draw.games_since_last_win, 1);
        assert_eq!(draw.games_since_last_loss, 0);
    }

    #[test]
    fn test_winning_run_after_losses() {
        let info = calculate_streak(&sequence(&[Loss, Loss, Win, Win, Win]));
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.streak_type, Some(StreakType::Win));
        assert_eq!(info.games_since_last_loss, 3);
        assert_eq!(info.games_since_last_win, 0);
    }

    #[test]
    fn test_draws_extend_losing_run() {
        let info = calculate_streak(&sequence(&[Win, Loss, Draw, Loss]));
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.streak_type, Some(StreakType::Loss));
        assert_eq!(info.games_since_last_win, 3);
        assert_eq!(info.games_since_last_loss, 0);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut records = sequence(&[Loss, Win, Win]);
        records.reverse();
        let info = calculate_streak(&records);
        assert_eq!(info.current_streak, 2);
        assert_eq!(info.streak_type, Some(StreakType::Win));
    }

    #[test]
    fn test_all_wins() {
        let info = calculate_streak(&sequence(&[Win, Win, Win, Win]));
        assert_eq!(info.current_streak, 4);
        assert_eq!(info.games_since_last_loss, 4);
        assert_eq!(info.games_since_last_win, 0);
    }

    #[test]
    fn test_same_day_keeps_input_order() {
        let records = vec![
            make_match(1, "2024-05-01", Loss, None),
            make_match(2, "2024-05-01", Win, None),
        ];
        // Stable sort leaves the loss first on the shared date
        let info = calculate_streak(&records);
        assert_eq!(info.streak_type, Some(StreakType::Loss));
        assert_eq!(info.current_streak, 1);
        assert_eq!(info.games_since_last_win, 1);
    }
}
