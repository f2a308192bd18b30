mod achievements;
mod clock;
mod config;
mod limit;
mod models;
mod report;
mod stats;
mod store;
mod streak;
mod tracker;
mod tui;
mod update;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fd_lock::RwLock;
use models::{SessionStatus, MAX_TASK_LEN};
use report::Reporter;
use std::fs::OpenOptions;
use store::FileStore;
use tracker::Tracker;
use tui::SessionVerdict;

#[derive(Parser)]
#[command(name = "uno")]
#[command(about = "Focus on one task at a time and build a daily streak", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a focus session for a single task
    Start {
        /// The one task to focus on (20 characters max)
        task: String,
        /// Countdown duration (e.g. 25m, 1h); open-ended if omitted
        #[arg(long = "for", value_name = "DURATION")]
        duration: Option<String>,
    },
    /// Show this week's sessions, streak and badges
    Report,
    /// Manage the list of deferred distractions
    Distract {
        #[command(subcommand)]
        action: DistractAction,
    },
    /// Update uno to the latest version
    SelfUpdate,
}

#[derive(Subcommand)]
enum DistractAction {
    /// Note something to deal with later
    Add { text: String },
    /// List deferred distractions
    List,
    /// Remove a distraction by id
    Rm { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { task, duration } => start_session(&task, duration)?,
        Commands::Report => {
            let reporter = Reporter::new(Tracker::open()?);
            reporter.report()?;
        }
        Commands::Distract { action } => distract(action)?,
        Commands::SelfUpdate => update::update()?,
    }

    Ok(())
}

fn start_session(task: &str, duration: Option<String>) -> Result<()> {
    let task = task.trim();
    if task.is_empty() {
        anyhow::bail!("The task cannot be empty.");
    }
    if task.chars().count() > MAX_TASK_LEN {
        anyhow::bail!(
            "Keep it small: the task must be {} characters or fewer.",
            MAX_TASK_LEN
        );
    }

    let countdown = match duration {
        Some(raw) => {
            let parsed = humantime::parse_duration(&raw)?;
            Some(chrono::Duration::from_std(parsed)?)
        }
        None => None,
    };

    let config = config::load_config()?;
    let mut tracker = Tracker::open()?;

    let base_dir = FileStore::get_base_dir()?;
    let lock_path = base_dir.join("uno.lock");
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(lock_path)?;

    let mut lock = RwLock::new(lock_file);
    let _guard = lock.try_write().map_err(|_| {
        anyhow::anyhow!(
            "Another uno session is already running. Finish it before starting a new one."
        )
    })?;

    if tracker.today_count()? >= config.daily_limit {
        println!("You have completed your unos for today. Rest, and come back tomorrow.");
        return Ok(());
    }

    let started_at = chrono::Utc::now();
    let verdict = tui::run_session(&mut tracker, task, started_at, countdown, config.daily_limit)?;

    let status = match verdict {
        SessionVerdict::Complete => SessionStatus::Complete,
        SessionVerdict::GiveUp => SessionStatus::Giveup,
        SessionVerdict::Abort => {
            println!("Session abandoned. Nothing was recorded.");
            return Ok(());
        }
    };

    let outcome = tracker.finish_session(task, status, started_at)?;

    match status {
        SessionStatus::Complete => {
            println!("\nWell done. \"{}\" is complete.", outcome.item.task);
        }
        SessionStatus::Giveup => {
            println!("\nYou let \"{}\" go. That is allowed.", outcome.item.task);
        }
    }
    println!(
        "Today: {}/{} | Focused for {}",
        outcome.today_count,
        config.daily_limit,
        utils::format_duration(outcome.item.duration_ms / 1000)
    );
    let day_word = if outcome.streak == 1 { "day" } else { "days" };
    println!("Current streak: {} {}", outcome.streak, day_word);
    for badge in &outcome.new_badges {
        println!("New badge unlocked: {} (streak {})", badge.badge, badge.streak);
    }

    Ok(())
}

fn distract(action: DistractAction) -> Result<()> {
    let mut tracker = Tracker::open()?;
    match action {
        DistractAction::Add { text } => {
            let text = text.trim();
            if text.is_empty() {
                anyhow::bail!("The distraction text cannot be empty.");
            }
            let distraction = tracker.add_distraction(text)?;
            println!("Noted ({}). Back to the one thing.", distraction.id);
        }
        DistractAction::List => {
            let distractions = tracker.distractions()?;
            if distractions.is_empty() {
                println!("No deferred distractions.");
            } else {
                for d in &distractions {
                    println!("{:>15}  {}", d.id, d.text);
                }
            }
        }
        DistractAction::Rm { id } => {
            if tracker.remove_distraction(id)? {
                println!("Removed.");
            } else {
                println!("No distraction with id {}.", id);
            }
        }
    }
    Ok(())
}
