use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::application::dtos::{StreakResultDto, INTERNAL_ERROR, USER_NOT_FOUND};
use studystreak_domain::shared::{DomainError, UserId};
use studystreak_domain::streak::{
    Clock, StreakDomainService, StreakPolicy, StreakRecord, StreakRepository, StreakTransition,
};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_SAVE_ATTEMPTS: u32 = 3;

/// Run a store call under `timeout`, mapping expiry to `DomainError::Timeout`.
pub(crate) async fn bounded<T, F>(
    timeout: Duration,
    operation: &str,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        DomainError::Timeout(format!(
            "{} exceeded {}ms",
            operation,
            timeout.as_millis()
        ))
    })?
}

/// Orchestrates load, decide and save for one user's streak record.
///
/// This is the only layer that talks to the store on the write path, and
/// the only place store failures are caught: callers always get a
/// `StreakResultDto`, never an error.
pub struct StreakEngine {
    repo: Arc<dyn StreakRepository>,
    clock: Arc<dyn Clock>,
    service: StreakDomainService,
    store_timeout: Duration,
    max_save_attempts: u32,
}

impl StreakEngine {
    pub fn new(
        repo: Arc<dyn StreakRepository>,
        clock: Arc<dyn Clock>,
        policy: StreakPolicy,
    ) -> Self {
        Self {
            repo,
            clock,
            service: StreakDomainService::new(policy),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            max_save_attempts: DEFAULT_MAX_SAVE_ATTEMPTS,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_max_save_attempts(mut self, attempts: u32) -> Self {
        self.max_save_attempts = attempts.max(1);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn record_valid_practice(
        &self,
        user_id: &UserId,
        practice_date: NaiveDate,
    ) -> StreakResultDto {
        let today = self.today();
        let outcome = self
            .apply(user_id, |record| {
                self.service.on_valid_practice(record, today, practice_date)
            })
            .await;

        self.finish(user_id, "record_valid_practice", outcome)
    }

    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn reconcile_missed_day(&self, user_id: &UserId, today: NaiveDate) -> StreakResultDto {
        let outcome = self
            .apply(user_id, |record| {
                Ok(self.service.reconcile_missed_day(record, today))
            })
            .await;

        self.finish(user_id, "reconcile_missed_day", outcome)
    }

    /// Load the record, decide, and save if the decision changed it.
    ///
    /// A lost optimistic-concurrency race reloads and decides again on the
    /// fresh snapshot, up to `max_save_attempts` times.
    async fn apply<F>(&self, user_id: &UserId, decide: F) -> Result<StreakTransition, DomainError>
    where
        F: Fn(&StreakRecord) -> Result<StreakTransition, DomainError>,
    {
        let exists = bounded(
            self.store_timeout,
            "check user exists",
            self.repo.user_exists(user_id),
        )
        .await?;
        if !exists {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }

        let mut attempt = 1;
        loop {
            let record = bounded(
                self.store_timeout,
                "load streak record",
                self.repo.load(user_id),
            )
            .await?
            .unwrap_or_else(|| StreakRecord::new(user_id.clone()));

            let transition = decide(&record)?;
            if !transition.is_changed() {
                debug!(event = %transition.event(), "No change, skipping save");
                return Ok(transition);
            }

            match bounded(
                self.store_timeout,
                "save streak record",
                self.repo.save(transition.record()),
            )
            .await
            {
                Ok(()) => return Ok(transition),
                Err(DomainError::ConcurrencyConflict(msg)) if attempt < self.max_save_attempts => {
                    warn!(attempt, "Streak record changed concurrently, retrying: {}", msg);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn finish(
        &self,
        user_id: &UserId,
        operation: &str,
        outcome: Result<StreakTransition, DomainError>,
    ) -> StreakResultDto {
        match outcome {
            Ok(transition) => {
                let snapshot = transition.record().snapshot();
                info!(
                    user_id = %user_id,
                    event = %transition.event(),
                    current_streak = snapshot.current_streak,
                    freeze_tokens = snapshot.freeze_tokens_available,
                    changed = transition.is_changed(),
                    "{}: {}",
                    operation,
                    transition.message()
                );
                StreakResultDto::from(&transition)
            }
            Err(DomainError::UserNotFound(_)) => {
                info!(user_id = %user_id, "{}: user not found", operation);
                StreakResultDto::failure(USER_NOT_FOUND)
            }
            Err(DomainError::Validation(msg)) => {
                info!(user_id = %user_id, "{}: rejected: {}", operation, msg);
                StreakResultDto::failure(msg)
            }
            Err(e) => {
                error!(
                    user_id = %user_id,
                    code = e.code().code(),
                    transient = e.is_transient(),
                    "{} failed: {}",
                    operation,
                    e
                );
                StreakResultDto::failure(INTERNAL_ERROR)
            }
        }
    }
}
