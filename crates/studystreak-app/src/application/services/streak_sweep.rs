use chrono::NaiveDate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

use super::streak_engine::{bounded, StreakEngine};
use crate::application::dtos::SweepReport;
use studystreak_domain::shared::DomainError;
use studystreak_domain::streak::{StreakEventType, StreakRepository};

/// Daily pass that resolves missed days for every user with a lapsed
/// active streak.
pub struct StreakSweepService {
    engine: Arc<StreakEngine>,
    repo: Arc<dyn StreakRepository>,
    pause: Duration,
}

impl StreakSweepService {
    pub fn new(engine: Arc<StreakEngine>, repo: Arc<dyn StreakRepository>, pause: Duration) -> Self {
        Self {
            engine,
            repo,
            pause,
        }
    }

    pub async fn run(&self) -> Result<SweepReport, DomainError> {
        let today = self.engine.today();
        self.run_for(today).await
    }

    /// Reconcile every due user as of `today`.
    ///
    /// Only the initial listing can fail the sweep; per-user failures are
    /// counted in the report.
    #[instrument(skip(self))]
    pub async fn run_for(&self, today: NaiveDate) -> Result<SweepReport, DomainError> {
        let started_at = Instant::now();

        let due = bounded(
            self.engine.store_timeout(),
            "list users due for reconcile",
            self.repo.find_due_for_reconcile(today),
        )
        .await?;

        info!("Reconcile sweep for {} started: {} users due", today, due.len());

        let mut report = SweepReport::empty(today);
        report.total = due.len();

        for (index, user_id) in due.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let result = self.engine.reconcile_missed_day(user_id, today).await;
            if !result.success {
                warn!("Reconcile failed for user {}: {}", user_id, result.message);
                report.failed += 1;
                continue;
            }

            report.succeeded += 1;
            match result.event_type {
                Some(StreakEventType::FreezeUsed) => report.freeze_used += 1,
                Some(StreakEventType::StreakLost) => report.streak_lost += 1,
                _ => {}
            }
        }

        report.elapsed_ms = started_at.elapsed().as_millis() as u64;

        if report.failed > 0 {
            error!(
                total = report.total,
                failed = report.failed,
                "Reconcile sweep for {} finished with failures ({}ms)",
                today,
                report.elapsed_ms
            );
        } else {
            info!(
                total = report.total,
                freeze_used = report.freeze_used,
                streak_lost = report.streak_lost,
                "Reconcile sweep for {} finished ({}ms)",
                today,
                report.elapsed_ms
            );
        }

        Ok(report)
    }
}
