//! SQLite match store

use super::players::Player;
use crate::{MatchId, MatchRecord, RawMatch, Result, Sport};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SELECT_GAMES: &str = "SELECT id, sport, game_type, game_date, result, opponent_name,
        opponent2_name, partner_name, score, detailed_score, location, notes
     FROM games";

const SELECT_PLAYERS: &str =
    "SELECT sport, name, dominant_hand, level, play_style, age_group, notes FROM players";

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY,
                sport TEXT NOT NULL,
                game_type TEXT NOT NULL,
                game_date TEXT NOT NULL,
                result TEXT NOT NULL,
                opponent_name TEXT NOT NULL,
                opponent2_name TEXT,
                partner_name TEXT,
                score TEXT,
                detailed_score TEXT,
                location TEXT,
                notes TEXT
            );

            CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sport TEXT NOT NULL,
                name TEXT NOT NULL,
                dominant_hand TEXT NOT NULL DEFAULT 'right',
                level TEXT NOT NULL DEFAULT 'intermediate',
                play_style TEXT NOT NULL DEFAULT 'all_around',
                age_group TEXT NOT NULL DEFAULT '20_39',
                notes TEXT,
                UNIQUE(sport, name)
            );

            CREATE INDEX IF NOT EXISTS idx_games_date ON games(game_date);
            CREATE INDEX IF NOT EXISTS idx_games_sport ON games(sport);
            "#,
        )?;
        Ok(())
    }

    // ==================== Match Operations ====================

    /// Insert or replace a match, keyed by id
    pub fn upsert_match(&self, record: &MatchRecord) -> Result<()> {
        let raw = RawMatch::from(record);
        self.conn.execute(
            r#"
            INSERT INTO games (id, sport, game_type, game_date, result, opponent_name,
                               opponent2_name, partner_name, score, detailed_score,
                               location, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                sport = excluded.sport,
                game_type = excluded.game_type,
                game_date = excluded.game_date,
                result = excluded.result,
                opponent_name = excluded.opponent_name,
                opponent2_name = excluded.opponent2_name,
                partner_name = excluded.partner_name,
                score = excluded.score,
                detailed_score = excluded.detailed_score,
                location = excluded.location,
                notes = excluded.notes
            "#,
            params![
                raw.id,
                raw.sport,
                raw.game_type,
                raw.game_date,
                raw.result,
                raw.opponent_name,
                raw.opponent2_name,
                raw.partner_name,
                raw.score,
                raw.detailed_score,
                raw.location,
                raw.notes,
            ],
        )?;
        Ok(())
    }

    /// Insert multiple matches in one transaction
    pub fn upsert_matches(&mut self, records: &[MatchRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO games (id, sport, game_type, game_date, result,
                    opponent_name, opponent2_name, partner_name, score, detailed_score,
                    location, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for record in records {
                let raw = RawMatch::from(record);
                stmt.execute(params![
                    raw.id,
                    raw.sport,
                    raw.game_type,
                    raw.game_date,
                    raw.result,
                    raw.opponent_name,
                    raw.opponent2_name,
                    raw.partner_name,
                    raw.score,
                    raw.detailed_score,
                    raw.location,
                    raw.notes,
                ])?;
            }
        }
        tx.commit()?;
        log::info!("Stored {} matches", records.len());
        Ok(records.len())
    }

    /// Delete a match; returns whether it existed
    pub fn delete_match(&self, id: MatchId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM games WHERE id = ?1", params![id.0])?;
        Ok(deleted > 0)
    }

    pub fn get_match(&self, id: MatchId) -> Result<Option<MatchRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_GAMES),
                params![id.0],
                Self::row_to_raw,
            )
            .optional()?;
        Ok(raw.and_then(Self::to_record))
    }

    /// Get all matches, oldest first
    pub fn get_all_matches(&self) -> Result<Vec<MatchRecord>> {
        self.get_matches_query(&format!("{} ORDER BY game_date, id", SELECT_GAMES), params![])
    }

    /// Get matches of one sport, oldest first
    pub fn get_sport_matches(&self, sport: Sport) -> Result<Vec<MatchRecord>> {
        self.get_matches_query(
            &format!("{} WHERE sport = ?1 ORDER BY game_date, id", SELECT_GAMES),
            params![sport.code()],
        )
    }

    /// Get matches on or after a date, oldest first
    pub fn get_matches_since(&self, date: NaiveDate) -> Result<Vec<MatchRecord>> {
        self.get_matches_query(
            &format!("{} WHERE game_date >= ?1 ORDER BY game_date, id", SELECT_GAMES),
            params![date.format("%Y-%m-%d").to_string()],
        )
    }

    /// Distinct opponent and partner names, sorted
    pub fn get_player_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT opponent_name AS name FROM games
             UNION SELECT opponent2_name FROM games WHERE opponent2_name IS NOT NULL
             UNION SELECT partner_name FROM games WHERE partner_name IS NOT NULL
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn get_matches_query(
        &self,
        query: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<MatchRecord>> {
        let mut stmt = self.conn.prepare(query)?;
        let rows = stmt
            .query_map(params, Self::row_to_raw)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().filter_map(Self::to_record).collect())
    }

    fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawMatch> {
        Ok(RawMatch {
            id: row.get(0)?,
            sport: row.get(1)?,
            game_type: row.get(2)?,
            game_date: row.get(3)?,
            result: row.get(4)?,
            opponent_name: row.get(5)?,
            opponent2_name: row.get(6)?,
            partner_name: row.get(7)?,
            score: row.get(8)?,
            detailed_score: row.get(9)?,
            location: row.get(10)?,
            notes: row.get(11)?,
        })
    }

    /// Rows edited outside the application may no longer validate; skip them
    fn to_record(raw: RawMatch) -> Option<MatchRecord> {
        match MatchRecord::try_from(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping stored match: {}", e);
                None
            }
        }
    }

    // ==================== Player Operations ====================

    /// Insert or update a player profile, keyed by sport and name
    pub fn upsert_player(&self, player: &Player) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO players (sport, name, dominant_hand, level, play_style, age_group, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(sport, name) DO UPDATE SET
                dominant_hand = excluded.dominant_hand,
                level = excluded.level,
                play_style = excluded.play_style,
                age_group = excluded.age_group,
                notes = excluded.notes
            "#,
            params![
                player.sport.code(),
                player.name,
                player.dominant_hand,
                player.level,
                player.play_style,
                player.age_group,
                player.notes,
            ],
        )?;
        Ok(())
    }

    /// Register every opponent and partner named in the matches.
    /// Existing profiles are left alone; returns how many were added.
    pub fn register_players(&mut self, records: &[MatchRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut added = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO players (sport, name) VALUES (?1, ?2)")?;
            for record in records {
                let names = record.opponents().into_iter().chain(record.partner());
                for name in names {
                    added += stmt.execute(params![record.sport.code(), name])?;
                }
            }
        }
        tx.commit()?;
        log::info!("Registered {} new players", added);
        Ok(added)
    }

    /// Players ordered by sport then name, or by name within one sport
    pub fn get_players(&self, sport: Option<Sport>) -> Result<Vec<Player>> {
        match sport {
            Some(sport) => self.get_players_query(
                &format!("{} WHERE sport = ?1 ORDER BY name", SELECT_PLAYERS),
                params![sport.code()],
            ),
            None => self.get_players_query(
                &format!("{} ORDER BY sport, name", SELECT_PLAYERS),
                params![],
            ),
        }
    }

    fn get_players_query(
        &self,
        query: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Player>> {
        let mut stmt = self.conn.prepare(query)?;
        let rows = stmt
            .query_map(params, Self::row_to_player)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().flatten().collect())
    }

    fn row_to_player(row: &rusqlite::Row) -> rusqlite::Result<Option<Player>> {
        let code: String = row.get(0)?;
        let name: String = row.get(1)?;
        let Some(sport) = Sport::from_code(&code) else {
            log::warn!("Skipping stored player {}: unknown sport {}", name, code);
            return Ok(None);
        };
        Ok(Some(Player {
            sport,
            name,
            dominant_hand: row.get(2)?,
            level: row.get(3)?,
            play_style: row.get(4)?,
            age_group: row.get(5)?,
            notes: row.get(6)?,
        }))
    }

    // ==================== Statistics ====================

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let match_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;

        let player_count = self.get_player_names()?.len();

        let (min_date, max_date): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(game_date), MAX(game_date) FROM games",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(DatabaseStats {
            match_count: match_count as usize,
            player_count,
            earliest_match: min_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            latest_match: max_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub match_count: usize,
    pub player_count: usize,
    pub earliest_match: Option<NaiveDate>,
    pub latest_match: Option<NaiveDate>,
}
