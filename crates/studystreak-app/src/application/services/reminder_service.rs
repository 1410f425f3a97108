use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use super::streak_engine::bounded;
use crate::application::dtos::ReminderDto;
use studystreak_domain::shared::DomainError;
use studystreak_domain::streak::{compose_reminder_message, Clock, StreakRepository};

/// Builds the evening nudge for users who still have to practise today.
pub struct ReminderService {
    repo: Arc<dyn StreakRepository>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl ReminderService {
    pub fn new(repo: Arc<dyn StreakRepository>, clock: Arc<dyn Clock>, store_timeout: Duration) -> Self {
        Self {
            repo,
            clock,
            store_timeout,
        }
    }

    pub async fn pending_reminders(&self) -> Result<Vec<ReminderDto>, DomainError> {
        let today = self.clock.today();
        let candidates = bounded(
            self.store_timeout,
            "list reminder candidates",
            self.repo.find_reminder_candidates(today),
        )
        .await?;

        Ok(candidates
            .into_iter()
            .map(|candidate| {
                let message = compose_reminder_message(
                    candidate.current_streak,
                    candidate.freeze_tokens_available,
                );
                ReminderDto::new(candidate, message)
            })
            .collect())
    }

    /// Reminders are logged only; delivery belongs to the notification
    /// layer of the wider platform.
    #[instrument(skip(self))]
    pub async fn dispatch_daily_reminders(&self) -> Result<usize, DomainError> {
        let reminders = self.pending_reminders().await?;

        for reminder in &reminders {
            info!(
                user_id = %reminder.user_id,
                email = %reminder.email,
                current_streak = reminder.current_streak,
                "Streak reminder: {}",
                reminder.message
            );
        }

        info!("Prepared {} streak reminders", reminders.len());
        Ok(reminders.len())
    }
}
