use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use pickem::config::Config;
use pickem::picks::{accepted_edits, align_picks, validate_picks};
use pickem::scoring::{season_standings, weekly_results, StandingsScope};
use pickem::season::{DataProvider, Outcome, PickEdit, SeasonData};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a config file interactively
    Init,
    /// Print the week that is currently open
    CurrentWeek,
    /// Show a user's picks for a week with lock state and limits
    Picks {
        /// User id (login e-mail)
        #[arg(short, long)]
        user: String,
        #[arg(long, requires = "week")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        week: Option<u32>,
    },
    /// Validate and save a batch of picks
    Submit {
        /// User id (login e-mail)
        #[arg(short, long)]
        user: String,
        /// Pick edit as ID=SELECTION:POINTS, e.g. 12=home:5 or 12=none (repeatable)
        #[arg(short, long = "pick", required = true)]
        picks: Vec<String>,
        #[arg(long, requires = "week")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        week: Option<u32>,
    },
    /// Show the results grid for a week
    Results {
        #[arg(long, requires = "week")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        week: Option<u32>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show the ranked standings through a week
    Standings {
        #[arg(long, requires = "week")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        week: Option<u32>,
        /// Only count the given week instead of the season to date
        #[arg(long)]
        week_only: bool,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Record a game's final score, or reset it to pending
    Score {
        #[arg(long)]
        game: i64,
        #[arg(long, required_unless_present = "pending", requires = "away")]
        home: Option<u32>,
        #[arg(long, required_unless_present = "pending", requires = "home")]
        away: Option<u32>,
        #[arg(long, conflicts_with_all = ["home", "away"])]
        pending: bool,
    },
    /// Create empty picks for every user and game of a season
    GeneratePicks {
        #[arg(long)]
        year: i32,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pickem")]
#[command(about = "Weekly NFL pick'em pool", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pickem/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Evaluate locks and the current week at this instant (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

fn exit_with(code: i32, context: &str, err: impl Display) -> ! {
    eprintln!("{}: {}", context, err);
    std::process::exit(code);
}

fn resolve_week(data: &SeasonData, year: Option<i32>, week: Option<u32>, now: DateTime<Utc>) -> (i32, u32) {
    match (year, week) {
        (Some(year), Some(week)) => (year, week),
        _ => data
            .current_week(now)
            .unwrap_or_else(|e| exit_with(EXIT_DATA, "Cannot determine current week", e)),
    }
}

fn save(path: &std::path::Path, data: &SeasonData) {
    if let Err(e) = pickem::season::save_season(path, data) {
        exit_with(EXIT_DATA, "Failed to save season data", format!("{:#}", e));
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = pickem::config::init::run_init_wizard(config_path) {
            exit_with(EXIT_CONFIG, "Init failed", format!("{:#}", e));
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config: Config = match pickem::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, "Config error", format!("{:#}", e)),
    };

    if let Err(errors) = pickem::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let domain = config.point_domain();
    let data_path = config.data_path();
    let now = cli.now.unwrap_or_else(Utc::now);
    debug!(data = %data_path.display(), %now, "loaded config");

    let mut data = match pickem::season::load_season(&data_path) {
        Ok(d) => d,
        Err(e) => exit_with(EXIT_DATA, "Season data error", format!("{:#}", e)),
    };

    let use_colors = pickem::output::should_use_colors();

    match cli.command {
        // Handled before the config is loaded
        Commands::Init => {}
        Commands::CurrentWeek => {
            let (year, week) = resolve_week(&data, None, None, now);
            println!("{} week {}", year, week);
        }
        Commands::Picks { user, year, week } => {
            let (year, week) = resolve_week(&data, year, week, now);
            let games = data
                .weekly_games(year, week)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            let picks = data
                .weekly_picks(&user, year, week)
                .and_then(|picks| align_picks(&games, picks))
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            let pvs = data
                .week_pvs(year, week)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));

            println!("{} week {} picks for {}", year, week, user);
            println!(
                "{}",
                pickem::output::format_pick_form(&games, &picks, &data.teams(), &pvs, now, use_colors)
            );
        }
        Commands::Submit {
            user,
            picks,
            year,
            week,
        } => {
            let edits: Vec<PickEdit> = picks
                .iter()
                .map(|p| PickEdit::parse(p))
                .collect::<anyhow::Result<_>>()
                .unwrap_or_else(|e| exit_with(EXIT_INVALID, "Invalid pick", e));

            let (year, week) = resolve_week(&data, year, week, now);
            let games = data
                .weekly_games(year, week)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            let existing = data
                .weekly_picks(&user, year, week)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            let pvs = data
                .week_pvs(year, week)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));

            let outside = pvs.outside_domain(&domain);
            if !outside.is_empty() {
                exit_with(
                    EXIT_CONFIG,
                    "Week limits use point values not in point_values",
                    format!("{:?}", outside),
                );
            }

            let report = validate_picks(&domain, &pvs, &games, &existing, &edits, now)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            if !report.is_valid() {
                println!("{}", pickem::output::format_rejection(&report, use_colors));
                std::process::exit(EXIT_INVALID);
            }

            let accepted = accepted_edits(&games, &existing, &edits, now)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            let skipped = edits.len() - accepted.len();
            if skipped > 0 {
                warn!(skipped, "some edits were not saved (locked game or no selection)");
            }

            if let Err(e) = data.apply_edits(&user, &accepted) {
                exit_with(EXIT_DATA, "Data error", e);
            }
            save(&data_path, &data);
            info!(user = %user, year, week, saved = accepted.len(), "picks submitted");
            println!("Picks submitted successfully!");
        }
        Commands::Results { year, week, tsv } => {
            let (year, week) = resolve_week(&data, year, week, now);
            let results = weekly_results(&data, year, week)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            if tsv {
                println!("{}", pickem::output::format_results_tsv(&results));
            } else {
                println!("{} - Week {} Results", year, week);
                println!("{}", pickem::output::format_results_table(&results, use_colors));
            }
        }
        Commands::Standings {
            year,
            week,
            week_only,
            tsv,
        } => {
            let (year, week) = resolve_week(&data, year, week, now);
            let scope = if week_only {
                StandingsScope::Week { year, week }
            } else {
                StandingsScope::SeasonThrough { year, week }
            };
            let rows = season_standings(&data, scope)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            if tsv {
                println!("{}", pickem::output::format_standings_tsv(&rows));
            } else {
                println!("{} standings through week {}", year, week);
                println!("{}", pickem::output::format_standings_table(&rows, use_colors));
            }
        }
        Commands::Score {
            game,
            home,
            away,
            pending,
        } => {
            let outcome = match (pending, home, away) {
                (false, Some(home), Some(away)) => Outcome::Final { home, away },
                _ => Outcome::Pending,
            };
            if let Err(e) = data.set_outcome(game, outcome) {
                exit_with(EXIT_DATA, "Data error", e);
            }
            save(&data_path, &data);
            println!("Game {} recorded as {:?}", game, outcome);
        }
        Commands::GeneratePicks { year } => {
            let created = data
                .generate_season_picks(year)
                .unwrap_or_else(|e| exit_with(EXIT_DATA, "Data error", e));
            save(&data_path, &data);
            println!("Created {} empty picks for {}", created, year);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
