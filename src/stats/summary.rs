//! Per-sport and overall totals
//!
//! Unlike the per-opponent statistics, draws get their own bucket here.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::{GameType, MatchRecord, MatchResult, Sport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportSummary {
    pub sport: Sport,
    pub total_games: usize,
    pub singles_games: usize,
    pub doubles_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Distinct opponents and partners faced
    pub players: usize,
    /// Percent to one decimal place
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
    /// In order of first appearance
    pub sports_played: Vec<Sport>,
    pub by_sport: Vec<SportSummary>,
}

fn one_decimal_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (wins as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Totals for one sport; records of other sports are ignored
pub fn summarize_sport(records: &[MatchRecord], sport: Sport) -> SportSummary {
    let mut summary = SportSummary {
        sport,
        total_games: 0,
        singles_games: 0,
        doubles_games: 0,
        wins: 0,
        losses: 0,
        draws: 0,
        players: 0,
        win_rate: 0.0,
    };
    let mut players: BTreeSet<&str> = BTreeSet::new();

    for record in records.iter().filter(|r| r.sport == sport) {
        summary.total_games += 1;
        match record.game_type() {
            GameType::Singles => summary.singles_games += 1,
            GameType::Doubles => summary.doubles_games += 1,
        }
        match record.result {
            MatchResult::Win => summary.wins += 1,
            MatchResult::Loss => summary.losses += 1,
            MatchResult::Draw => summary.draws += 1,
        }
        players.extend(record.opponents());
        players.extend(record.partner());
    }

    summary.players = players.len();
    summary.win_rate = one_decimal_rate(summary.wins, summary.total_games);
    summary
}

/// Totals across all sports with a per-sport breakdown
pub fn summarize(records: &[MatchRecord]) -> OverallSummary {
    let mut sports_played: Vec<Sport> = Vec::new();
    for record in records {
        if !sports_played.contains(&record.sport) {
            sports_played.push(record.sport);
        }
    }

    let by_sport: Vec<SportSummary> = sports_played
        .iter()
        .map(|sport| summarize_sport(records, *sport))
        .collect();

    let wins = by_sport.iter().map(|s| s.wins).sum();
    let losses = by_sport.iter().map(|s| s.losses).sum();
    let draws = by_sport.iter().map(|s| s.draws).sum();

    log::debug!(
        "Summary over {} games in {} sports",
        records.len(),
        sports_played.len()
    );

    OverallSummary {
        total_games: records.len(),
        wins,
        losses,
        draws,
        win_rate: one_decimal_rate(wins, records.len()),
        sports_played,
        by_sport,
    }
}
