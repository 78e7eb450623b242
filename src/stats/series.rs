//! Chronological series for charts and reports
//!
//! Every series is built from the snapshot it is given and ordered oldest
//! first. Games sharing a date keep their input order.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

use super::score::parse_score;
use super::{oldest_first, percent};
use crate::{MatchRecord, MatchResult};

/// Cumulative win rate at the end of a playing day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub games: usize,
    pub win_rate: u32,
}

/// Signed run length after a game: positive for wins, negative otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakPoint {
    pub date: NaiveDate,
    pub streak: i32,
}

/// Running set balance after a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub balance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayOfWeekStats {
    pub weekday: Weekday,
    pub total: usize,
    pub win_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekCount {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub games: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyFrequency {
    /// Only weeks with at least one game
    pub weeks: Vec<WeekCount>,
    /// Mean games per listed week, 0.0 when empty
    pub average: f64,
}

/// One point per distinct date with the win rate over every game up to it
pub fn win_rate_evolution(records: &[MatchRecord]) -> Vec<RatePoint> {
    let mut by_date: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_date.entry(record.date).or_insert((0, 0));
        entry.1 += 1;
        if record.is_win() {
            entry.0 += 1;
        }
    }

    let (mut wins, mut games) = (0, 0);
    by_date
        .into_iter()
        .map(|(date, (day_wins, day_games))| {
            wins += day_wins;
            games += day_games;
            RatePoint {
                date,
                games,
                win_rate: percent(wins, games),
            }
        })
        .collect()
}

/// Running streak counter per game
///
/// A game with the same result as the previous one extends the run, any
/// other result restarts it at +1 for a win or -1 otherwise. A loss after a
/// draw therefore restarts at -1.
pub fn streak_series(records: &[MatchRecord]) -> Vec<StreakPoint> {
    let mut streak = 0i32;
    let mut previous: Option<MatchResult> = None;

    oldest_first(records)
        .into_iter()
        .map(|record| {
            let step = if record.is_win() { 1 } else { -1 };
            streak = match previous {
                Some(result) if result != record.result => step,
                _ => streak + step,
            };
            previous = Some(record.result);
            StreakPoint {
                date: record.date,
                streak,
            }
        })
        .collect()
}

/// Cumulative set balance per game; games without a score count +1 or -1 by result
pub fn set_balance_series(records: &[MatchRecord]) -> Vec<BalancePoint> {
    let mut balance = 0i64;

    oldest_first(records)
        .into_iter()
        .map(|record| {
            balance += match record.score.as_deref() {
                Some(score) if !score.is_empty() => parse_score(Some(score)).balance,
                _ if record.is_win() => 1,
                _ => -1,
            };
            BalancePoint {
                date: record.date,
                balance,
            }
        })
        .collect()
}

/// Games and win rate per weekday, Sunday first
pub fn day_of_week(records: &[MatchRecord]) -> [DayOfWeekStats; 7] {
    let mut counts = [(0usize, 0usize); 7];
    for record in records {
        let slot = &mut counts[record.date.weekday().num_days_from_sunday() as usize];
        slot.0 += 1;
        if record.is_win() {
            slot.1 += 1;
        }
    }

    let mut weekday = Weekday::Sun;
    counts.map(|(total, wins)| {
        let stats = DayOfWeekStats {
            weekday,
            total,
            win_rate: percent(wins, total),
        };
        weekday = weekday.succ();
        stats
    })
}

/// Games per Monday-started week
pub fn weekly_frequency(records: &[MatchRecord]) -> WeeklyFrequency {
    let mut by_week: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *by_week.entry(week_start(record.date)).or_insert(0) += 1;
    }

    let weeks: Vec<WeekCount> = by_week
        .into_iter()
        .map(|(week_start, games)| WeekCount { week_start, games })
        .collect();
    let average = if weeks.is_empty() {
        0.0
    } else {
        weeks.iter().map(|w| w.games).sum::<usize>() as f64 / weeks.len() as f64
    };

    WeeklyFrequency { weeks, average }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
