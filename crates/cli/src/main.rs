//! Portfolio CLI - Database migrations and content management.
//!
//! # Usage
//!
//! ```bash
//! # Create the portfolio and session tables
//! portfolio-cli migrate
//!
//! # Load projects into the database
//! portfolio-cli seed projects crates/site/content/projects.yaml
//!
//! # Review contact submissions
//! portfolio-cli submissions list --unread
//! portfolio-cli submissions mark-read 3
//!
//! # Check which theme a visitor sees at a given time
//! portfolio-cli theme resolve --at 18:00
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use portfolio_core::{SubmissionId, ThemeMode};

mod commands;

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(author, version, about = "Portfolio site CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from content files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Moderate contact submissions
    Submissions {
        #[command(subcommand)]
        action: SubmissionAction,
    },
    /// Inspect theme resolution
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert projects from a YAML file
    Projects {
        /// Path to the projects YAML file
        file: String,

        /// Delete existing projects first
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum SubmissionAction {
    /// List submissions, newest first
    List {
        /// Only show unread submissions
        #[arg(long)]
        unread: bool,
    },
    /// Mark a submission as read
    MarkRead { id: SubmissionId },
    /// Delete a submission
    Delete { id: SubmissionId },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Show the mode for a local time
    Resolve {
        /// Local time as HH:MM
        #[arg(long, value_parser = parse_time)]
        at: NaiveTime,

        /// Pin the mode instead of following the clock (`light` or `dark`)
        #[arg(long)]
        manual: Option<ThemeMode>,
    },
}

fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Projects { file, replace } => {
                commands::seed::projects(&file, replace).await?;
            }
        },
        Commands::Submissions { action } => match action {
            SubmissionAction::List { unread } => commands::submissions::list(unread).await?,
            SubmissionAction::MarkRead { id } => commands::submissions::mark_read(id).await?,
            SubmissionAction::Delete { id } => commands::submissions::delete(id).await?,
        },
        Commands::Theme { action } => match action {
            ThemeAction::Resolve { at, manual } => commands::theme::run(at, manual),
        },
    }
    Ok(())
}
