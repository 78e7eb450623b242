//! Racket-sport match analytics
//!
//! Logs singles and doubles results across several racket sports and derives
//! head-to-head, streak and trend statistics per opponent or partner.

pub mod data;
pub mod stats;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use stats::ranking::SortOption;
pub use stats::trend::TrendMethod;
pub use stats::MatchStatsEngine;

/// Unique identifier for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Match({})", self.0)
    }
}

/// Racket sports a match can be logged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    TableTennis,
    Badminton,
    Tennis,
    Squash,
    Padel,
    BeachTennis,
    Pickleball,
}

impl Sport {
    pub const ALL: [Sport; 7] = [
        Sport::TableTennis,
        Sport::Badminton,
        Sport::Tennis,
        Sport::Squash,
        Sport::Padel,
        Sport::BeachTennis,
        Sport::Pickleball,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Sport::TableTennis => "table_tennis",
            Sport::Badminton => "badminton",
            Sport::Tennis => "tennis",
            Sport::Squash => "squash",
            Sport::Padel => "padel",
            Sport::BeachTennis => "beach_tennis",
            Sport::Pickleball => "pickleball",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "table_tennis" => Some(Sport::TableTennis),
            "badminton" => Some(Sport::Badminton),
            "tennis" => Some(Sport::Tennis),
            "squash" => Some(Sport::Squash),
            "padel" => Some(Sport::Padel),
            "beach_tennis" => Some(Sport::BeachTennis),
            "pickleball" => Some(Sport::Pickleball),
            _ => None,
        }
    }

    /// Game types the sport is played in
    pub fn game_types(&self) -> &'static [GameType] {
        match self {
            Sport::Squash => &[GameType::Singles],
            Sport::Padel | Sport::BeachTennis => &[GameType::Doubles],
            _ => &[GameType::Singles, GameType::Doubles],
        }
    }

    pub fn allows(&self, game_type: GameType) -> bool {
        self.game_types().contains(&game_type)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::TableTennis => write!(f, "Table Tennis"),
            Sport::Badminton => write!(f, "Badminton"),
            Sport::Tennis => write!(f, "Tennis"),
            Sport::Squash => write!(f, "Squash"),
            Sport::Padel => write!(f, "Padel"),
            Sport::BeachTennis => write!(f, "Beach Tennis"),
            Sport::Pickleball => write!(f, "Pickleball"),
        }
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Sport::from_code(&s.replace('-', "_")).ok_or_else(|| {
            let codes: Vec<_> = Sport::ALL.iter().map(|s| s.code()).collect();
            format!("Unknown sport: {}. Use one of {}.", s, codes.join(", "))
        })
    }
}

/// Singles or doubles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Singles,
    Doubles,
}

impl GameType {
    pub fn code(&self) -> &'static str {
        match self {
            GameType::Singles => "singles",
            GameType::Doubles => "doubles",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "singles" => Some(GameType::Singles),
            "doubles" => Some(GameType::Doubles),
            _ => None,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GameType::from_code(s)
            .ok_or_else(|| format!("Unknown game type: {}. Use singles or doubles.", s))
    }
}

/// Outcome of a match from the logging player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    pub fn code(&self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
            MatchResult::Draw => "draw",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "win" => Some(MatchResult::Win),
            "loss" => Some(MatchResult::Loss),
            "draw" => Some(MatchResult::Draw),
            _ => None,
        }
    }

    /// Draws count as non-wins everywhere in the statistics engine
    pub fn is_win(&self) -> bool {
        matches!(self, MatchResult::Win)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Who was on court besides the logging player and the first opponent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameFormat {
    Singles,
    Doubles {
        partner: Option<String>,
        second_opponent: Option<String>,
    },
}

impl GameFormat {
    pub fn game_type(&self) -> GameType {
        match self {
            GameFormat::Singles => GameType::Singles,
            GameFormat::Doubles { .. } => GameType::Doubles,
        }
    }
}

/// A single logged match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub sport: Sport,
    pub date: NaiveDate,
    pub result: MatchResult,
    pub opponent: String,
    pub format: GameFormat,
    /// Summary score, e.g. "2-1" or "3-0 (11-5, 11-3, 11-7)"
    pub score: Option<String>,
    /// Points per set, e.g. "11-5,8-11,12-10"
    pub detailed_score: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl MatchRecord {
    pub fn is_win(&self) -> bool {
        self.result.is_win()
    }

    pub fn game_type(&self) -> GameType {
        self.format.game_type()
    }

    /// Partner name for doubles
    pub fn partner(&self) -> Option<&str> {
        match &self.format {
            GameFormat::Doubles { partner, .. } => partner.as_deref(),
            GameFormat::Singles => None,
        }
    }

    /// Second opponent name for doubles
    pub fn second_opponent(&self) -> Option<&str> {
        match &self.format {
            GameFormat::Doubles {
                second_opponent, ..
            } => second_opponent.as_deref(),
            GameFormat::Singles => None,
        }
    }

    /// Every named opponent on the other side of the net
    pub fn opponents(&self) -> Vec<&str> {
        std::iter::once(self.opponent.as_str())
            .chain(self.second_opponent())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Loosely-typed match shape used by JSON files and the SQLite store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub id: i64,
    pub sport: String,
    pub game_type: String,
    pub game_date: String,
    pub result: String,
    pub opponent_name: String,
    #[serde(default)]
    pub opponent2_name: Option<String>,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub detailed_score: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawMatch> for MatchRecord {
    type Error = RacketError;

    fn try_from(raw: RawMatch) -> Result<Self> {
        let id = MatchId(raw.id);
        let invalid = |what: String| RacketError::InvalidArgument(format!("{}: {}", id, what));

        let sport = Sport::from_code(&raw.sport)
            .ok_or_else(|| invalid(format!("unknown sport '{}'", raw.sport)))?;
        let game_type = GameType::from_code(&raw.game_type)
            .ok_or_else(|| invalid(format!("unknown game type '{}'", raw.game_type)))?;
        if !sport.allows(game_type) {
            return Err(invalid(format!("{} is not played as {}", sport, game_type)));
        }
        let date = NaiveDate::parse_from_str(&raw.game_date, "%Y-%m-%d")
            .map_err(|e| invalid(format!("bad date '{}' ({})", raw.game_date, e)))?;
        let result = MatchResult::from_code(&raw.result)
            .ok_or_else(|| invalid(format!("unknown result '{}'", raw.result)))?;
        if raw.opponent_name.trim().is_empty() {
            return Err(invalid("missing opponent name".to_string()));
        }

        let partner = non_empty(raw.partner_name);
        let second_opponent = non_empty(raw.opponent2_name);
        let format = match game_type {
            GameType::Singles => {
                if partner.is_some() || second_opponent.is_some() {
                    return Err(invalid("singles match with doubles players".to_string()));
                }
                GameFormat::Singles
            }
            GameType::Doubles => GameFormat::Doubles {
                partner,
                second_opponent,
            },
        };

        Ok(MatchRecord {
            id,
            sport,
            date,
            result,
            opponent: raw.opponent_name,
            format,
            score: non_empty(raw.score),
            detailed_score: non_empty(raw.detailed_score),
            location: raw.location,
            notes: raw.notes,
        })
    }
}

impl From<&MatchRecord> for RawMatch {
    fn from(record: &MatchRecord) -> Self {
        RawMatch {
            id: record.id.0,
            sport: record.sport.code().to_string(),
            game_type: record.game_type().code().to_string(),
            game_date: record.date.format("%Y-%m-%d").to_string(),
            result: record.result.code().to_string(),
            opponent_name: record.opponent.clone(),
            opponent2_name: record.second_opponent().map(str::to_string),
            partner_name: record.partner().map(str::to_string),
            score: record.score.clone(),
            detailed_score: record.detailed_score.clone(),
            location: record.location.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum RacketError {
    #[error("Invalid match record {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No matches recorded with {0}")]
    UnknownPlayer(String),

    #[error("No matches in database - run `racket data import` first")]
    NoMatches,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, RacketError>;

/// Application configuration loaded from racket.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub trend_method: TrendMethod,
    pub default_sort: SortOption,
    /// Only analyse matches from the last N days; all history when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sport: Option<Sport>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                database_path: "data/racket.db".to_string(),
            },
            analysis: AnalysisConfig {
                trend_method: TrendMethod::default(),
                default_sort: SortOption::default(),
                period_days: None,
                default_sport: None,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RacketError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| RacketError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RacketError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Statistics engine configured with the chosen trend method
    pub fn engine(&self) -> MatchStatsEngine {
        MatchStatsEngine::new(self.analysis.trend_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(game_type: &str) -> RawMatch {
        RawMatch {
            id: 7,
            sport: "table_tennis".to_string(),
            game_type: game_type.to_string(),
            game_date: "2024-03-01".to_string(),
            result: "win".to_string(),
            opponent_name: "Ana".to_string(),
            opponent2_name: None,
            partner_name: None,
            score: Some("3-1".to_string()),
            detailed_score: None,
            location: None,
            notes: None,
        }
    }

    #[test]
    fn test_raw_singles_conversion() {
        let record = MatchRecord::try_from(raw("singles")).unwrap();
        assert_eq!(record.id, MatchId(7));
        assert_eq!(record.sport, Sport::TableTennis);
        assert_eq!(record.format, GameFormat::Singles);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(record.is_win());
    }

    #[test]
    fn test_raw_doubles_drops_blank_names() {
        let mut r = raw("doubles");
        r.partner_name = Some("Bia".to_string());
        r.opponent2_name = Some("  ".to_string());
        let record = MatchRecord::try_from(r).unwrap();
        assert_eq!(record.partner(), Some("Bia"));
        assert_eq!(record.second_opponent(), None);
        assert_eq!(record.opponents(), vec!["Ana"]);
    }

    #[test]
    fn test_raw_rejects_wrong_shape() {
        let mut bad_result = raw("singles");
        bad_result.result = "tie".to_string();
        assert!(matches!(
            MatchRecord::try_from(bad_result),
            Err(RacketError::InvalidArgument(_))
        ));

        let mut bad_date = raw("singles");
        bad_date.game_date = "01/03/2024".to_string();
        assert!(MatchRecord::try_from(bad_date).is_err());

        let mut singles_with_partner = raw("singles");
        singles_with_partner.partner_name = Some("Bia".to_string());
        assert!(MatchRecord::try_from(singles_with_partner).is_err());

        let mut squash_doubles = raw("doubles");
        squash_doubles.sport = "squash".to_string();
        assert!(MatchRecord::try_from(squash_doubles).is_err());
    }

    #[test]
    fn test_raw_round_trip() {
        let mut r = raw("doubles");
        r.sport = "padel".to_string();
        r.partner_name = Some("Bia".to_string());
        r.opponent2_name = Some("Caio".to_string());
        let record = MatchRecord::try_from(r.clone()).unwrap();
        assert_eq!(RawMatch::from(&record), r);
    }

    #[test]
    fn test_sport_codes() {
        for sport in Sport::ALL {
            assert_eq!(Sport::from_code(sport.code()), Some(sport));
        }
        assert_eq!("beach-tennis".parse::<Sport>(), Ok(Sport::BeachTennis));
        assert!(Sport::Squash.allows(GameType::Singles));
        assert!(!Sport::Padel.allows(GameType::Singles));
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("racket.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.analysis.trend_method = TrendMethod::LastThree;
        config.analysis.period_days = Some(90);
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/racket.toml"),
            Err(RacketError::Config(_))
        ));
    }
}
