use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use super::{ReminderService, StreakSweepService};

/// Cron schedules for the daily jobs, evaluated in UTC.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub reconcile_cron: String,
    pub reminder_cron: String,
}

/// Runs the reconcile sweep and the reminder job on their cron schedules.
pub struct StreakScheduler {
    scheduler: JobScheduler,
    sweep: Arc<StreakSweepService>,
    reminders: Arc<ReminderService>,
}

impl StreakScheduler {
    pub async fn new(
        sweep: Arc<StreakSweepService>,
        reminders: Arc<ReminderService>,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| anyhow!("Failed to create job scheduler: {:?}", e))?;

        Ok(Self {
            scheduler,
            sweep,
            reminders,
        })
    }

    pub async fn start(&self, config: &ScheduleConfig) -> Result<()> {
        let sweep = Arc::clone(&self.sweep);
        let sweep_job = Job::new_async(config.reconcile_cron.as_str(), move |_id, _scheduler| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                match sweep.run().await {
                    Ok(report) => info!(
                        "Scheduled sweep done: {} due, {} freeze used, {} lost, {} failed",
                        report.total, report.freeze_used, report.streak_lost, report.failed
                    ),
                    Err(e) => error!("Scheduled sweep aborted: {}", e.format_with_code()),
                }
            })
        })
        .map_err(|e| anyhow!("Invalid reconcile cron '{}': {:?}", config.reconcile_cron, e))?;

        let reminders = Arc::clone(&self.reminders);
        let reminder_job = Job::new_async(config.reminder_cron.as_str(), move |_id, _scheduler| {
            let reminders = Arc::clone(&reminders);
            Box::pin(async move {
                if let Err(e) = reminders.dispatch_daily_reminders().await {
                    error!("Scheduled reminders failed: {}", e.format_with_code());
                }
            })
        })
        .map_err(|e| anyhow!("Invalid reminder cron '{}': {:?}", config.reminder_cron, e))?;

        self.scheduler
            .add(sweep_job)
            .await
            .map_err(|e| anyhow!("Failed to add sweep job: {:?}", e))?;
        self.scheduler
            .add(reminder_job)
            .await
            .map_err(|e| anyhow!("Failed to add reminder job: {:?}", e))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| anyhow!("Failed to start job scheduler: {:?}", e))?;

        info!(
            "✅ Streak scheduler started (reconcile: '{}', reminders: '{}', UTC)",
            config.reconcile_cron, config.reminder_cron
        );
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| anyhow!("Failed to stop job scheduler: {:?}", e))?;
        info!("🛑 Streak scheduler stopped");
        Ok(())
    }
}
