use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::application::services::StreakScheduler;
use crate::presentation::state::AppState;
use studystreak_domain::shared::UserId;
use studystreak_infrastructure::persistence::users::register_user;

#[derive(Parser)]
#[command(name = "studystreak", version, about = "Daily practice streak engine")]
pub struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also log to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the daily reconcile and reminder jobs until Ctrl-C
    Serve,
    /// Record a confirmed practice for a user
    Practice {
        user_id: String,
        /// Practice date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Resolve a missed day for a user
    Reconcile {
        user_id: String,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Reconcile every user whose streak has lapsed
    Sweep,
    /// Show a user's streak and milestone progress
    Summary { user_id: String },
    /// Top streak holders
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// List pending streak reminders for today
    Reminders,
    /// Register a user in the local database
    AddUser {
        user_id: String,
        email: String,
        #[arg(long, default_value = "")]
        name: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(command: Commands, state: AppState) -> Result<()> {
    match command {
        Commands::Serve => serve(state).await,
        Commands::Practice { user_id, date } => {
            let engine = &state.services.engine;
            let date = date.unwrap_or_else(|| engine.today());
            let result = engine
                .record_valid_practice(&UserId::from_string(&user_id), date)
                .await;
            print_json(&result)
        }
        Commands::Reconcile { user_id, today } => {
            let engine = &state.services.engine;
            let today = today.unwrap_or_else(|| engine.today());
            let result = engine
                .reconcile_missed_day(&UserId::from_string(&user_id), today)
                .await;
            print_json(&result)
        }
        Commands::Sweep => {
            let report = state.services.sweep.run().await?;
            print_json(&report)
        }
        Commands::Summary { user_id } => {
            let summary = state
                .queries
                .get_summary(&UserId::from_string(&user_id))
                .await?;
            print_json(&summary)
        }
        Commands::Leaderboard { limit } => {
            let board = state.queries.get_leaderboard(limit).await?;
            print_json(&board)
        }
        Commands::Reminders => {
            let reminders = state.services.reminders.pending_reminders().await?;
            print_json(&reminders)
        }
        Commands::AddUser {
            user_id,
            email,
            name,
        } => {
            if user_id.trim().is_empty() {
                bail!("User id cannot be empty");
            }
            let user_id = UserId::from_string(user_id.trim());
            register_user(&state.pool, &user_id, &email, &name).await?;
            println!("Registered user {}", user_id);
            Ok(())
        }
    }
}

async fn serve(state: AppState) -> Result<()> {
    let mut scheduler = StreakScheduler::new(
        state.services.sweep.clone(),
        state.services.reminders.clone(),
    )
    .await?;
    scheduler.start(&state.schedule).await?;

    info!("Waiting for Ctrl-C");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    scheduler.shutdown().await?;
    state.pool.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_practice_with_date() {
        let cli = Cli::try_parse_from(["studystreak", "practice", "alice", "--date", "2025-06-14"])
            .unwrap();
        match cli.command {
            Commands::Practice { user_id, date } => {
                assert_eq!(user_id, "alice");
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 14));
            }
            _ => panic!("expected practice"),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["studystreak", "sweep", "--config", "/tmp/streak.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Sweep));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/streak.json")));
    }

    #[test]
    fn test_leaderboard_default_limit() {
        let cli = Cli::try_parse_from(["studystreak", "leaderboard"]).unwrap();
        assert!(matches!(cli.command, Commands::Leaderboard { limit: 10 }));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let parsed = Cli::try_parse_from(["studystreak", "practice", "alice", "--date", "June 1"]);
        assert!(parsed.is_err());
    }
}
