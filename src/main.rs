//! Racket match log CLI
//!
//! Imports logged matches into a local store and prints head-to-head tables,
//! form series and per-sport summaries.

use clap::{Parser, Subcommand};
use racket::{Config, Result};

#[derive(Parser)]
#[command(name = "racket")]
#[command(about = "Head-to-head and form analytics for racket-sport matches", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "racket.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Ranking table of opponents or partners
    Table {
        /// singles or doubles
        #[arg(long = "type", default_value = "singles")]
        game_type: racket::GameType,
        /// opponent or partner (doubles only)
        #[arg(long, default_value = "opponent")]
        role: racket::data::Role,
        /// win_rate, hardest, most_played, recent_first or best_balance
        #[arg(long)]
        sort: Option<racket::SortOption>,
        #[command(flatten)]
        scope: Scope,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Head-to-head record with one player
    H2h {
        /// Opponent or partner name
        name: String,
        #[arg(long = "type", default_value = "singles")]
        game_type: racket::GameType,
        #[arg(long, default_value = "opponent")]
        role: racket::data::Role,
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Chronological form series
    Series {
        /// evolution, streak, balance, weekday or weekly
        kind: SeriesKind,
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Totals per sport and overall
    Summary {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Player directory with against/with records
    Players {
        #[command(subcommand)]
        action: Option<PlayerCommands>,
        /// Only this sport
        #[arg(long)]
        sport: Option<racket::Sport>,
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Check a set score against per-set points, e.g. `check-score 2-1 11-5 8-11 11-9`
    CheckScore {
        /// Sets score, "won-lost"
        score: String,
        /// Points per set, "you-opponent"
        sets: Vec<String>,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Import matches from a JSON file
    Import {
        /// JSON array of matches
        file: String,
    },
    /// Export stored matches to a JSON file
    Export {
        /// Output path
        output: String,
    },
    /// Show database status
    Status,
}

#[derive(Subcommand)]
enum PlayerCommands {
    /// Add or update a player profile
    Add {
        name: String,
        #[arg(long)]
        sport: racket::Sport,
        /// right or left
        #[arg(long, default_value = "right")]
        hand: String,
        /// beginner, intermediate or advanced
        #[arg(long, default_value = "intermediate")]
        level: String,
        #[arg(long, default_value = "all_around")]
        style: String,
        #[arg(long, default_value = "20_39")]
        age_group: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Which matches a command looks at
#[derive(clap::Args, Clone, Debug)]
struct Scope {
    /// Only this sport (defaults to analysis.default_sport)
    #[arg(long)]
    sport: Option<racket::Sport>,
    /// Only the last N days (defaults to analysis.period_days)
    #[arg(long)]
    days: Option<u32>,
    /// Ignore configured sport and period defaults
    #[arg(long)]
    all: bool,
}

#[derive(Clone, Copy, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum SeriesKind {
    Evolution,
    Streak,
    Balance,
    Weekday,
    Weekly,
}

impl std::str::FromStr for SeriesKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "evolution" => Ok(SeriesKind::Evolution),
            "streak" => Ok(SeriesKind::Streak),
            "balance" => Ok(SeriesKind::Balance),
            "weekday" => Ok(SeriesKind::Weekday),
            "weekly" => Ok(SeriesKind::Weekly),
            _ => Err(format!(
                "Unknown series: {}. Use evolution, streak, balance, weekday or weekly.",
                s
            )),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Import { file } => commands::data_import(&config, &file),
            DataCommands::Export { output } => commands::data_export(&config, &output),
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Table {
            game_type,
            role,
            sort,
            scope,
            format,
        } => commands::table(&config, game_type, role, sort, &scope, format),
        Commands::H2h {
            name,
            game_type,
            role,
            scope,
            format,
        } => commands::h2h(&config, &name, game_type, role, &scope, format),
        Commands::Series {
            kind,
            scope,
            format,
        } => commands::series(&config, kind, &scope, format),
        Commands::Summary { scope, format } => commands::summary(&config, &scope, format),
        Commands::Players {
            action: Some(PlayerCommands::Add {
                name,
                sport,
                hand,
                level,
                style,
                age_group,
                notes,
            }),
            ..
        } => {
            let player = racket::data::Player {
                sport,
                name,
                dominant_hand: hand,
                level,
                play_style: style,
                age_group,
                notes,
            };
            commands::player_add(&config, &player)
        }
        Commands::Players {
            action: None,
            sport,
            format,
        } => commands::players(&config, sport, format),
        Commands::CheckScore { score, sets } => commands::check_score(&score, &sets),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use racket::data::{import, Database, MatchFilter, Player, Role};
    use racket::stats::{self, PlayerStats, ScoreConsistency, TrendDirection};
    use racket::{GameType, MatchRecord, RacketError, SortOption};
    use serde::Serialize;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'racket data import games.json' to load matches");
        println!("  3. Run 'racket table' to rank your opponents");
        println!("  4. Run 'racket h2h \"Name\"' for a head-to-head record");

        Ok(())
    }

    pub fn data_import(config: &Config, file: &str) -> Result<()> {
        let mut db = Database::open(&config.data.database_path)?;

        let report = import::read_json(file)?;
        if report.records.is_empty() {
            println!("No valid matches found in {}", file);
        } else {
            let count = db.upsert_matches(&report.records)?;
            println!("Stored {} matches in database", count);
            let added = db.register_players(&report.records)?;
            if added > 0 {
                println!("Added {} new players", added);
            }
        }
        for note in report.notes() {
            println!("{}", note);
        }

        Ok(())
    }

    pub fn data_export(config: &Config, output: &str) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let records = db.get_all_matches()?;
        import::write_json(output, &records)?;
        println!("Exported {} matches to {}", records.len(), output);
        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:     {}", config.data.database_path);
        println!("  Matches:  {}", stats.match_count);
        println!("  Players:  {}", stats.player_count);
        if let (Some(earliest), Some(latest)) = (stats.earliest_match, stats.latest_match) {
            println!("  Range:    {} to {}", earliest, latest);
        }

        Ok(())
    }

    /// Stored matches narrowed to the command's scope
    fn load_matches(config: &Config, scope: &Scope) -> Result<Vec<MatchRecord>> {
        let db = Database::open(&config.data.database_path)?;
        let records = db.get_all_matches()?;
        if records.is_empty() {
            return Err(RacketError::NoMatches);
        }

        let (default_sport, default_days) = if scope.all {
            (None, None)
        } else {
            (config.analysis.default_sport, config.analysis.period_days)
        };

        let mut filter = MatchFilter::new();
        if let Some(sport) = scope.sport.or(default_sport) {
            filter = filter.sport(sport);
        }
        if let Some(days) = scope.days.or(default_days) {
            let today = chrono::Local::now().date_naive();
            filter = filter.within_days(today, days);
        }

        let selected = filter.apply(&records);
        log::debug!("{} of {} matches in scope", selected.len(), records.len());
        Ok(selected)
    }

    fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
        let json =
            serde_json::to_string_pretty(value).map_err(|e| RacketError::Parse(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }

    fn trend_label(stats: &PlayerStats) -> &'static str {
        match stats.trend.map(|t| t.direction) {
            Some(TrendDirection::Up) => "up",
            Some(TrendDirection::Down) => "down",
            Some(TrendDirection::Stable) => "stable",
            None => "-",
        }
    }

    fn streak_label(stats: &PlayerStats) -> String {
        match stats.streak.streak_type {
            Some(stats::StreakType::Win) => format!("W{}", stats.streak.current_streak),
            Some(stats::StreakType::Loss) => format!("L{}", stats.streak.current_streak),
            None => "-".to_string(),
        }
    }

    fn signed(value: i64) -> String {
        if value > 0 {
            format!("+{}", value)
        } else {
            value.to_string()
        }
    }

    pub fn table(
        config: &Config,
        game_type: GameType,
        role: Role,
        sort: Option<SortOption>,
        scope: &Scope,
        format: OutputFormat,
    ) -> Result<()> {
        let records = load_matches(config, scope)?;
        let groups = racket::data::group_for(&records, game_type, role);
        let sort = sort.unwrap_or(config.analysis.default_sort);
        let rows = config.engine().rank(&groups, sort);

        match format {
            OutputFormat::Json => print_json(&rows)?,
            OutputFormat::Table => {
                if rows.is_empty() {
                    println!("No {} games in scope", game_type);
                    return Ok(());
                }
                let heading = match (game_type, role) {
                    (GameType::Doubles, Role::Partner) => "Partner",
                    _ => "Opponent",
                };
                println!(
                    "{:<20} {:>5} {:>5} {:>5} {:>6} {:>6} {:>6} {:>7}  {}",
                    heading, "W", "L", "GP", "Win%", "Sets", "Streak", "Trend", "Last"
                );
                println!("{}", "─".repeat(80));
                for row in &rows {
                    let s = &row.stats;
                    println!(
                        "{:<20} {:>5} {:>5} {:>5} {:>5}% {:>6} {:>6} {:>7}  {}",
                        row.name,
                        s.wins,
                        s.losses,
                        s.total,
                        s.win_rate,
                        signed(s.set_balance),
                        streak_label(s),
                        trend_label(s),
                        s.last_played()
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
                println!("\nSorted by {}", sort);
            }
        }

        Ok(())
    }

    pub fn h2h(
        config: &Config,
        name: &str,
        game_type: GameType,
        role: Role,
        scope: &Scope,
        format: OutputFormat,
    ) -> Result<()> {
        let records = load_matches(config, scope)?;
        let engine = config.engine();
        let h2h = engine.head_to_head(&records, name, game_type, role)?;

        match format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "head_to_head": &h2h,
                    "regression": engine.regression(&h2h.records),
                });
                print_json(&json)?;
            }
            OutputFormat::Table => {
                let prefix = match role {
                    Role::Partner if game_type == GameType::Doubles => "with",
                    _ => "vs",
                };
                let s = &h2h.stats;
                println!("Head-to-head {} {} ({})", prefix, h2h.name, game_type);
                println!("───────────────────────────────");
                println!("  Record:   {}-{} ({}%)", s.wins, s.losses, s.win_rate);
                println!(
                    "  Sets:     {}-{} ({})",
                    s.sets_won,
                    s.sets_lost,
                    signed(s.set_balance)
                );
                println!("  Streak:   {}", streak_label(s));
                if s.streak.games_since_last_win > 0 {
                    println!("  Since win: {} games", s.streak.games_since_last_win);
                }
                println!("  Trend:    {} ({})", trend_label(s), engine.trend_method());
                if let Some(line) = engine.regression(&h2h.records) {
                    println!(
                        "  Fit:      {:+.2} -> {:+.2} (slope {:+.3})",
                        line.start_y, line.end_y, line.slope
                    );
                }

                println!();
                for game in &h2h.records {
                    let mut players = String::new();
                    if game_type == GameType::Doubles {
                        if let Some(partner) = game.partner() {
                            players.push_str(&format!("with {} ", partner));
                        }
                        players.push_str(&format!("vs {}", game.opponents().join(" / ")));
                    }
                    println!(
                        "  {}  {:<5} {:<24} {}",
                        game.date,
                        game.result.code(),
                        game.score.as_deref().unwrap_or("-"),
                        players
                    );
                }
            }
        }

        Ok(())
    }

    pub fn series(
        config: &Config,
        kind: SeriesKind,
        scope: &Scope,
        format: OutputFormat,
    ) -> Result<()> {
        let records = load_matches(config, scope)?;

        match (kind, format) {
            (SeriesKind::Evolution, OutputFormat::Json) => {
                print_json(&stats::win_rate_evolution(&records))?
            }
            (SeriesKind::Evolution, OutputFormat::Table) => {
                for point in stats::win_rate_evolution(&records) {
                    println!("{}  {:>4} games  {:>3}%", point.date, point.games, point.win_rate);
                }
            }
            (SeriesKind::Streak, OutputFormat::Json) => {
                print_json(&stats::streak_series(&records))?
            }
            (SeriesKind::Streak, OutputFormat::Table) => {
                for point in stats::streak_series(&records) {
                    println!("{}  {:>+4}", point.date, point.streak);
                }
            }
            (SeriesKind::Balance, OutputFormat::Json) => {
                print_json(&stats::set_balance_series(&records))?
            }
            (SeriesKind::Balance, OutputFormat::Table) => {
                for point in stats::set_balance_series(&records) {
                    println!("{}  {:>5}", point.date, signed(point.balance));
                }
            }
            (SeriesKind::Weekday, OutputFormat::Json) => {
                print_json(&stats::day_of_week(&records))?
            }
            (SeriesKind::Weekday, OutputFormat::Table) => {
                for day in stats::day_of_week(&records) {
                    println!("{}  {:>4} games  {:>3}%", day.weekday, day.total, day.win_rate);
                }
            }
            (SeriesKind::Weekly, OutputFormat::Json) => {
                print_json(&stats::weekly_frequency(&records))?
            }
            (SeriesKind::Weekly, OutputFormat::Table) => {
                let frequency = stats::weekly_frequency(&records);
                for week in &frequency.weeks {
                    println!("week of {}  {:>3}", week.week_start, week.games);
                }
                println!("\nAverage: {:.1} games per week", frequency.average);
            }
        }

        Ok(())
    }

    pub fn summary(config: &Config, scope: &Scope, format: OutputFormat) -> Result<()> {
        let records = load_matches(config, scope)?;
        let overall = stats::summarize(&records);

        match format {
            OutputFormat::Json => print_json(&overall)?,
            OutputFormat::Table => {
                println!(
                    "{:<14} {:>6} {:>7} {:>7} {:>5} {:>5} {:>5} {:>7} {:>7}",
                    "Sport", "Games", "Singles", "Doubles", "W", "L", "D", "Players", "Win%"
                );
                println!("{}", "─".repeat(72));
                for s in &overall.by_sport {
                    println!(
                        "{:<14} {:>6} {:>7} {:>7} {:>5} {:>5} {:>5} {:>7} {:>6.1}%",
                        s.sport.to_string(),
                        s.total_games,
                        s.singles_games,
                        s.doubles_games,
                        s.wins,
                        s.losses,
                        s.draws,
                        s.players,
                        s.win_rate
                    );
                }
                println!("{}", "─".repeat(72));
                println!(
                    "{:<14} {:>6} {:>7} {:>7} {:>5} {:>5} {:>5} {:>7} {:>6.1}%",
                    "Overall",
                    overall.total_games,
                    "",
                    "",
                    overall.wins,
                    overall.losses,
                    overall.draws,
                    "",
                    overall.win_rate
                );
            }
        }

        Ok(())
    }

    pub fn player_add(config: &Config, player: &Player) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        db.upsert_player(player)?;
        println!("Saved {} ({})", player.name, player.sport);
        Ok(())
    }

    pub fn players(
        config: &Config,
        sport: Option<racket::Sport>,
        format: OutputFormat,
    ) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let players = db.get_players(sport)?;
        let records = db.get_all_matches()?;
        let tallies = racket::data::player_tallies(&players, &records);

        match format {
            OutputFormat::Json => print_json(&tallies)?,
            OutputFormat::Table => {
                if tallies.is_empty() {
                    println!("No players registered");
                    return Ok(());
                }
                println!(
                    "{:<20} {:<14} {:<6} {:<13} {:>9} {:>9}",
                    "Player", "Sport", "Hand", "Level", "Against", "With"
                );
                println!("{}", "─".repeat(76));
                for t in &tallies {
                    println!(
                        "{:<20} {:<14} {:<6} {:<13} {:>9} {:>9}",
                        t.player.name,
                        t.player.sport.to_string(),
                        t.player.dominant_hand,
                        t.player.level,
                        format!("{}-{}/{}", t.wins_against, t.losses_against, t.games_against),
                        format!("{}-{}/{}", t.wins_with, t.losses_with, t.games_with),
                    );
                }
            }
        }

        Ok(())
    }

    pub fn check_score(score: &str, sets: &[String]) -> Result<()> {
        let sets: Vec<&str> = sets.iter().map(String::as_str).collect();
        let check = ScoreConsistency::check_strings(score, &sets);

        if check.consistent {
            println!("Score {} matches the set points", score);
        } else {
            println!(
                "Score {} does not match the set points ({}-{})",
                score, check.detailed_sets_won, check.detailed_sets_lost
            );
        }

        let tally = stats::SetTally::from_entries(&sets);
        if let Some(result) = tally.result {
            println!("Set points give {} ({})", tally.score(), result);
        }

        Ok(())
    }
}
