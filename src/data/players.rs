//! Player directory
//!
//! Opponents and partners are registered per sport with a short profile.
//! Their against/with records are tallied from the match list.

use serde::{Deserialize, Serialize};

use super::filter::{group_for, Groups, Role};
use crate::{GameType, MatchRecord, MatchResult, Sport};

/// A registered opponent or partner, unique per sport and name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub sport: Sport,
    pub name: String,
    pub dominant_hand: String,
    pub level: String,
    pub play_style: String,
    pub age_group: String,
    pub notes: Option<String>,
}

impl Player {
    /// Player with the default profile
    pub fn new(sport: Sport, name: &str) -> Self {
        Player {
            sport,
            name: name.to_string(),
            dominant_hand: "right".to_string(),
            level: "intermediate".to_string(),
            play_style: "all_around".to_string(),
            age_group: "20_39".to_string(),
            notes: None,
        }
    }
}

/// Games against and alongside one player
///
/// Draws count towards games but neither wins nor losses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerTally {
    #[serde(flatten)]
    pub player: Player,
    pub games_against: usize,
    pub wins_against: usize,
    pub losses_against: usize,
    pub games_with: usize,
    pub wins_with: usize,
    pub losses_with: usize,
}

fn count(games: Option<&Vec<MatchRecord>>) -> (usize, usize, usize) {
    let games = games.map(Vec::as_slice).unwrap_or_default();
    let wins = games.iter().filter(|g| g.result == MatchResult::Win).count();
    let losses = games.iter().filter(|g| g.result == MatchResult::Loss).count();
    (games.len(), wins, losses)
}

struct SportGroups {
    singles: Groups,
    doubles_against: Groups,
    doubles_with: Groups,
}

impl SportGroups {
    fn new(records: &[MatchRecord], sport: Sport) -> Self {
        let records: Vec<MatchRecord> = records
            .iter()
            .filter(|r| r.sport == sport)
            .cloned()
            .collect();
        SportGroups {
            singles: group_for(&records, GameType::Singles, Role::Opponent),
            doubles_against: group_for(&records, GameType::Doubles, Role::Opponent),
            doubles_with: group_for(&records, GameType::Doubles, Role::Partner),
        }
    }
}

/// Tally every player against the matches of their own sport
pub fn player_tallies(players: &[Player], records: &[MatchRecord]) -> Vec<PlayerTally> {
    let mut by_sport: Vec<(Sport, SportGroups)> = Vec::new();

    players
        .iter()
        .map(|player| {
            let index = match by_sport.iter().position(|(s, _)| *s == player.sport) {
                Some(index) => index,
                None => {
                    by_sport.push((player.sport, SportGroups::new(records, player.sport)));
                    by_sport.len() - 1
                }
            };
            let groups = &by_sport[index].1;

            let (singles, singles_wins, singles_losses) = count(groups.singles.get(&player.name));
            let (doubles, doubles_wins, doubles_losses) =
                count(groups.doubles_against.get(&player.name));
            let (games_with, wins_with, losses_with) =
                count(groups.doubles_with.get(&player.name));

            PlayerTally {
                player: player.clone(),
                games_against: singles + doubles,
                wins_against: singles_wins + doubles_wins,
                losses_against: singles_losses + doubles_losses,
                games_with,
                wins_with,
                losses_with,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::make_match;
    use crate::{GameFormat, MatchResult::*};

    fn doubles(
        id: i64,
        sport: Sport,
        result: MatchResult,
        partner: &str,
        first: &str,
        second: Option<&str>,
    ) -> MatchRecord {
        let mut record = make_match(id, "2024-02-01", result, None);
        record.sport = sport;
        record.opponent = first.to_string();
        record.format = GameFormat::Doubles {
            partner: Some(partner.to_string()),
            second_opponent: second.map(str::to_string),
        };
        record
    }

    fn records() -> Vec<MatchRecord> {
        vec![
            make_match(1, "2024-01-01", Win, None),
            make_match(2, "2024-01-02", Draw, None),
            doubles(3, Sport::TableTennis, Loss, "Ana", "Edu", None),
            doubles(4, Sport::Padel, Loss, "Bia", "Caio", Some("Duda")),
            doubles(5, Sport::Padel, Win, "Caio", "Bia", None),
        ]
    }

    type Counts = (usize, usize, usize, usize, usize, usize);

    fn tally_for(tallies: &[PlayerTally], sport: Sport, name: &str) -> Counts {
        let t = tallies
            .iter()
            .find(|t| t.player.sport == sport && t.player.name == name)
            .unwrap();
        (
            t.games_against,
            t.wins_against,
            t.losses_against,
            t.games_with,
            t.wins_with,
            t.losses_with,
        )
    }

    #[test]
    fn test_against_and_with_tallies() {
        let players = vec![
            Player::new(Sport::TableTennis, "Ana"),
            Player::new(Sport::Padel, "Bia"),
            Player::new(Sport::Padel, "Caio"),
        ];
        let tallies = player_tallies(&players, &records());
        assert_eq!(tallies.len(), 3);

        // the draw is a game but not a loss
        assert_eq!(tally_for(&tallies, Sport::TableTennis, "Ana"), (2, 1, 0, 1, 0, 1));
        assert_eq!(tally_for(&tallies, Sport::Padel, "Bia"), (1, 1, 0, 1, 0, 1));
        assert_eq!(tally_for(&tallies, Sport::Padel, "Caio"), (1, 0, 1, 1, 1, 0));
    }

    #[test]
    fn test_tally_ignores_other_sports() {
        let players = vec![Player::new(Sport::Padel, "Ana")];
        let tallies = player_tallies(&players, &records());
        assert_eq!(tally_for(&tallies, Sport::Padel, "Ana"), (0, 0, 0, 0, 0, 0));
    }

    #[test]
    fn test_default_profile() {
        let player = Player::new(Sport::Squash, "Gil");
        assert_eq!(player.dominant_hand, "right");
        assert_eq!(player.level, "intermediate");
        assert_eq!(player.notes, None);
    }
}
