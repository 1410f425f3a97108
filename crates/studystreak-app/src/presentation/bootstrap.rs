use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::application::queries::StreakQueries;
use crate::application::services::{
    ReminderService, ScheduleConfig, StreakEngine, StreakSweepService,
};
use crate::presentation::state::{AppState, Services};
use studystreak_domain::streak::{Clock, OffsetClock, StreakRepository};
use studystreak_infrastructure::config::Settings;
use studystreak_infrastructure::persistence::{repositories::SqliteStreakRepository, Database};

pub async fn build_app_state(settings: &Settings) -> Result<AppState> {
    let startup_started_at = Instant::now();

    info!("Database path: {}", settings.database_path.display());

    let started_at = Instant::now();
    let database = Database::new(&settings.database_path)
        .await
        .context("Failed to open database")?;
    info!(
        "✓ Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    let started_at = Instant::now();
    database
        .run_migrations()
        .await
        .context("Failed to run migrations")?;
    info!(
        "✓ Migrations completed ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pool = Arc::new(database.pool().clone());
    let repo = Arc::new(SqliteStreakRepository::new(pool.clone())) as Arc<dyn StreakRepository>;
    let clock = Arc::new(OffsetClock::new(settings.utc_offset_hours)) as Arc<dyn Clock>;
    let store_timeout = settings.store_timeout();

    let engine = Arc::new(
        StreakEngine::new(repo.clone(), clock.clone(), settings.policy.clone())
            .with_store_timeout(store_timeout)
            .with_max_save_attempts(settings.max_save_attempts),
    );
    let sweep = Arc::new(StreakSweepService::new(
        engine.clone(),
        repo.clone(),
        settings.sweep_pause(),
    ));
    let reminders = Arc::new(ReminderService::new(
        repo.clone(),
        clock.clone(),
        store_timeout,
    ));
    let queries = Arc::new(StreakQueries::new(
        repo,
        clock,
        settings.policy.milestone_rule(),
        store_timeout,
    ));

    info!(
        "✓ Streak services ready, today is {} (UTC{:+}) ({}ms total)",
        engine.today(),
        settings.utc_offset_hours,
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        pool,
        services: Services {
            engine,
            sweep,
            reminders,
        },
        queries,
        schedule: ScheduleConfig {
            reconcile_cron: settings.reconcile_cron.clone(),
            reminder_cron: settings.reminder_cron.clone(),
        },
    })
}
