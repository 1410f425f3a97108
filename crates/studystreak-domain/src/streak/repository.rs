use async_trait::async_trait;
use chrono::NaiveDate;

use super::{ReminderCandidate, StreakRecord, StreakStanding};
use crate::shared::{DomainError, UserId};

/// Durable storage for streak records, one per user.
///
/// Implementations must serialise read-modify-write cycles per user:
/// `save` only succeeds when the stored version still equals
/// `record.version()`, and fails with `DomainError::ConcurrencyConflict`
/// otherwise.
#[async_trait]
pub trait StreakRepository: Send + Sync {
    /// Whether the owning user entity exists.
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, DomainError>;

    /// Load the stored record, if any.
    async fn load(&self, user_id: &UserId) -> Result<Option<StreakRecord>, DomainError>;

    /// Persist a record loaded at `record.version()`.
    async fn save(&self, record: &StreakRecord) -> Result<(), DomainError>;

    /// Users with an active streak whose last practice is before `today - 1`.
    async fn find_due_for_reconcile(&self, today: NaiveDate) -> Result<Vec<UserId>, DomainError>;

    /// Users with an active streak who have not practised on `today`.
    async fn find_reminder_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>, DomainError>;

    /// Top streak holders by current, then longest streak.
    async fn find_top_streaks(&self, limit: u32) -> Result<Vec<StreakStanding>, DomainError>;
}
