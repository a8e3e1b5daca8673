//! Command line front-end for the club ladder
//!
//! Every invocation loads the configuration, opens the CSV stores, logs in
//! (for commands that need a session) and runs a single ladder or account
//! operation.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use club_ladder::account::AccountDirectory;
use club_ladder::config::{validate_config, AppConfig};
use club_ladder::display::{self, DisplayFormat};
use club_ladder::persistence::{CsvAccountStore, CsvPlayerStore};
use club_ladder::{LadderService, MatchOutcome, MatchResult, RatingEngine, Role, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

/// Club Ladder - Elo rankings for singles and doubles tennis
#[derive(Parser)]
#[command(
    name = "club-ladder",
    version,
    about = "Elo ranking ladder for a small tennis club",
    long_about = "Club Ladder keeps a tennis club's ranking table. Singles and doubles \
                 results update Elo-style ranking points, guests are listed apart from \
                 the ladder, and club accounts need admin approval before they can log in."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Data directory override
    #[arg(long, value_name = "DIR", help = "Override the directory holding the CSV tables")]
    data_dir: Option<PathBuf>,

    /// Account to act as
    #[arg(short, long, env = "LADDER_USER", value_name = "USER_ID")]
    user: Option<String>,

    /// Password of the acting account
    #[arg(short, long, env = "LADDER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the first admin account (no-op if it already exists)
    InitAdmin {
        user_id: String,
        username: String,
        password: String,
    },
    /// Register a new account; an admin must approve it
    SignUp {
        user_id: String,
        username: String,
        password: String,
    },
    /// Show the current ranking table
    Standings {
        #[arg(short, long, default_value = "text")]
        format: DisplayFormat,
    },
    /// Add a ranked player
    AddPlayer { name: String },
    /// Add a guest player
    AddGuest { name: String },
    /// Remove a guest player
    DeleteGuest { name: String },
    /// Remove any player (admin only)
    DeletePlayer { name: String },
    /// Record a singles match
    Singles {
        winner: String,
        loser: String,
        /// The match was drawn
        #[arg(long)]
        draw: bool,
    },
    /// Record a doubles match: two winners, then two losers
    Doubles {
        winner_a: String,
        winner_b: String,
        loser_a: String,
        loser_b: String,
        /// The match was drawn
        #[arg(long)]
        draw: bool,
    },
    /// Record a championship title
    Championship { name: String },
    /// Show win probabilities and resulting points for a singles match
    Preview { player_a: String, player_b: String },
    /// List accounts waiting for approval (admin only)
    Pending,
    /// Approve an account (admin only)
    Approve { user_id: String },
    /// Change an account's role, approving it (admin only)
    SetRole { user_id: String, role: Role },
    /// Delete an account (admin only)
    DeleteUser { user_id: String },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

struct Ladder {
    directory: AccountDirectory,
    service: LadderService,
}

impl Ladder {
    fn open(config: &AppConfig) -> Result<Self> {
        let accounts = CsvAccountStore::open(config.accounts_path())?;
        let players = CsvPlayerStore::open(config.players_path())?;
        let engine = RatingEngine::new(config.rating.clone())?;

        debug!(
            "Opened tables {} and {}",
            config.players_path().display(),
            config.accounts_path().display()
        );

        Ok(Self {
            directory: AccountDirectory::new(Arc::new(accounts)),
            service: LadderService::new(engine, Arc::new(players)),
        })
    }

    fn login(&self, args: &Args) -> Result<Session> {
        let user = args
            .user
            .as_deref()
            .ok_or_else(|| anyhow!("--user (or LADDER_USER) is required for this command"))?;
        let password = args
            .password
            .as_deref()
            .ok_or_else(|| anyhow!("--password (or LADDER_PASSWORD) is required for this command"))?;

        self.directory.login(user, password)
    }
}

fn outcome(draw: bool) -> MatchOutcome {
    if draw {
        MatchOutcome::Draw
    } else {
        MatchOutcome::AWins
    }
}

fn run(args: &Args, ladder: &Ladder) -> Result<()> {
    match &args.command {
        Command::InitAdmin {
            user_id,
            username,
            password,
        } => {
            let account = ladder
                .directory
                .bootstrap_admin(user_id, username, password)?;
            println!("Admin account '{}' is ready", account.user_id);
        }
        Command::SignUp {
            user_id,
            username,
            password,
        } => {
            let account = ladder.directory.sign_up(user_id, username, password)?;
            println!(
                "Account '{}' created, waiting for admin approval",
                account.user_id
            );
        }
        Command::Standings { format } => {
            let session = ladder.login(args)?;
            let snapshot = ladder.service.standings(&session)?;
            print!("{}", display::render(&snapshot, *format)?);
        }
        Command::AddPlayer { name } => {
            let session = ladder.login(args)?;
            let player = ladder.service.add_player(&session, name)?;
            println!("Added {} ({} points)", player.name, player.ranking_points);
        }
        Command::AddGuest { name } => {
            let session = ladder.login(args)?;
            let player = ladder.service.add_guest(&session, name)?;
            println!("Added guest {}", player.name);
        }
        Command::DeleteGuest { name } => {
            let session = ladder.login(args)?;
            let player = ladder.service.delete_guest(&session, name)?;
            println!("Deleted guest {}", player.name);
        }
        Command::DeletePlayer { name } => {
            let session = ladder.login(args)?;
            let player = ladder.service.delete_player(&session, name)?;
            println!("Deleted {}", player.name);
        }
        Command::Singles {
            winner,
            loser,
            draw,
        } => {
            let session = ladder.login(args)?;
            let result = MatchResult::singles(winner.as_str(), loser.as_str(), outcome(*draw));
            print_report(&ladder.service.submit_match(&session, &result)?);
        }
        Command::Doubles {
            winner_a,
            winner_b,
            loser_a,
            loser_b,
            draw,
        } => {
            let session = ladder.login(args)?;
            let result = MatchResult::doubles(
                (winner_a.as_str(), winner_b.as_str()),
                (loser_a.as_str(), loser_b.as_str()),
                outcome(*draw),
            );
            print_report(&ladder.service.submit_match(&session, &result)?);
        }
        Command::Championship { name } => {
            let session = ladder.login(args)?;
            let change = ladder.service.record_championship(&session, name)?;
            println!(
                "{} wins the championship: {} -> {} ({:+})",
                change.player,
                change.old_points,
                change.new_points,
                change.delta()
            );
        }
        Command::Preview { player_a, player_b } => {
            let session = ladder.login(args)?;
            let preview = ladder.service.preview_singles(&session, player_a, player_b)?;
            println!(
                "{} vs {}: {:.1}% / {:.1}%",
                preview.player_a,
                preview.player_b,
                preview.a_win_probability * 100.0,
                preview.b_win_probability * 100.0
            );
            println!(
                "  if {} wins: {} / {}",
                preview.player_a, preview.if_a_wins.0, preview.if_a_wins.1
            );
            println!(
                "  if {} wins: {} / {}",
                preview.player_b, preview.if_b_wins.0, preview.if_b_wins.1
            );
        }
        Command::Pending => {
            let session = ladder.login(args)?;
            let pending = ladder.directory.pending_accounts(&session)?;
            if pending.is_empty() {
                println!("No accounts waiting for approval");
            }
            for account in pending {
                println!(
                    "{}\t{}\tsigned up {}",
                    account.user_id,
                    account.username,
                    account.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Approve { user_id } => {
            let session = ladder.login(args)?;
            let account = ladder.directory.approve(&session, user_id)?;
            println!("Approved '{}' ({})", account.user_id, account.role);
        }
        Command::SetRole { user_id, role } => {
            let session = ladder.login(args)?;
            let account = ladder.directory.update_role(&session, user_id, *role)?;
            println!("'{}' is now {}", account.user_id, account.role);
        }
        Command::DeleteUser { user_id } => {
            let session = ladder.login(args)?;
            ladder.directory.delete_account(&session, user_id)?;
            println!("Deleted account '{}'", user_id);
        }
    }

    Ok(())
}

fn print_report(report: &club_ladder::MatchReport) {
    if report.rating_changes.is_empty() {
        println!("Draw recorded without rating changes");
        return;
    }

    for change in &report.rating_changes {
        println!(
            "{:<20} {:>6} -> {:>6} ({:+})",
            change.player,
            change.old_points,
            change.new_points,
            change.delta()
        );
    }
}

fn main() {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!(
        "{} {} using {}",
        config.service.name,
        club_ladder::VERSION,
        config.storage.data_dir.display()
    );

    let ladder = match Ladder::open(&config) {
        Ok(ladder) => ladder,
        Err(e) => {
            error!("Failed to open the ladder tables: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args, &ladder) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
