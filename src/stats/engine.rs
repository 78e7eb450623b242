//! Configured entry point to the statistics functions

use std::collections::BTreeMap;

use serde::Serialize;

use super::newest_first;
use super::player::{calculate_player_stats, PlayerStats};
use super::ranking::{sort_rows, RankingRow, SortOption};
use super::regression::{linear_regression, RegressionLine};
use super::streak::{calculate_streak, StreakInfo};
use super::trend::{calculate_trend, TrendInfo, TrendMethod};
use crate::data::filter::{group_for, Role};
use crate::{GameType, MatchRecord, RacketError, Result};

/// Every game with one opponent or partner, plus the statistics over them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub name: String,
    pub game_type: GameType,
    pub role: Role,
    /// Most recent first
    pub records: Vec<MatchRecord>,
    pub stats: PlayerStats,
}

/// Stateless statistics engine
///
/// Holds only the trend method, so every group it evaluates is classified
/// the same way. Each call works on the snapshot it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStatsEngine {
    trend_method: TrendMethod,
}

impl MatchStatsEngine {
    pub fn new(trend_method: TrendMethod) -> Self {
        MatchStatsEngine { trend_method }
    }

    pub fn trend_method(&self) -> TrendMethod {
        self.trend_method
    }

    pub fn player_stats(&self, records: &[MatchRecord]) -> PlayerStats {
        calculate_player_stats(records, self.trend_method)
    }

    pub fn streak(&self, records: &[MatchRecord]) -> StreakInfo {
        calculate_streak(records)
    }

    pub fn trend(&self, records: &[MatchRecord]) -> Option<TrendInfo> {
        calculate_trend(records, self.trend_method)
    }

    pub fn regression(&self, records: &[MatchRecord]) -> Option<RegressionLine> {
        linear_regression(records)
    }

    /// Head-to-head record with one named player
    ///
    /// Names are matched exactly. Fails with `UnknownPlayer` when no game
    /// in `records` involves `name` in the given role.
    pub fn head_to_head(
        &self,
        records: &[MatchRecord],
        name: &str,
        game_type: GameType,
        role: Role,
    ) -> Result<HeadToHead> {
        let mut groups = group_for(records, game_type, role);
        let games = groups
            .remove(name)
            .ok_or_else(|| RacketError::UnknownPlayer(name.to_string()))?;

        let stats = self.player_stats(&games);
        let records = newest_first(&games).into_iter().cloned().collect();
        Ok(HeadToHead {
            name: name.to_string(),
            game_type,
            role,
            records,
            stats,
        })
    }

    /// One ranking row per group, ordered by `sort`
    pub fn rank(
        &self,
        groups: &BTreeMap<String, Vec<MatchRecord>>,
        sort: SortOption,
    ) -> Vec<RankingRow> {
        let mut rows: Vec<RankingRow> = groups
            .iter()
            .map(|(name, records)| RankingRow {
                name: name.clone(),
                stats: self.player_stats(records),
            })
            .collect();
        sort_rows(&mut rows, sort);
        rows
    }
}
