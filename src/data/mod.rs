//! Data storage, import and selection
//!
//! SQLite match store, JSON import/export, the player directory, and the
//! filters and groupings that feed the statistics engine.

pub mod database;
pub mod filter;
pub mod import;
pub mod players;

pub use database::{Database, DatabaseStats};
pub use filter::{group_for, period_cutoff, Groups, MatchFilter, Role};
pub use import::ImportReport;
pub use players::{player_tallies, Player, PlayerTally};
