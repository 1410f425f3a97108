use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::value_objects::StreakSnapshot;
use crate::shared::{DomainError, UserId};

/// Per-user streak state.
///
/// `version` is the optimistic-concurrency token assigned by the store:
/// `0` means the record has never been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    user_id: UserId,
    current_streak: u32,
    longest_streak: u32,
    last_practice_date: Option<NaiveDate>,
    freeze_tokens_available: u32,
    version: i64,
}

impl StreakRecord {
    /// The implicit record of a user who has never practised.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_practice_date: None,
            freeze_tokens_available: 0,
            version: 0,
        }
    }

    /// Rebuilds a stored record. A `longest_streak` below `current_streak`
    /// is lifted to `current_streak`.
    pub fn restore(
        user_id: UserId,
        current_streak: u32,
        longest_streak: u32,
        last_practice_date: Option<NaiveDate>,
        freeze_tokens_available: u32,
        version: i64,
    ) -> Result<Self, DomainError> {
        if version < 0 {
            return Err(DomainError::DataIntegrity(format!(
                "Negative record version {} for user {}",
                version, user_id
            )));
        }

        Ok(Self {
            user_id,
            current_streak,
            longest_streak: longest_streak.max(current_streak),
            last_practice_date,
            freeze_tokens_available,
            version,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_practice_date(&self) -> Option<NaiveDate> {
        self.last_practice_date
    }

    pub fn freeze_tokens_available(&self) -> u32 {
        self.freeze_tokens_available
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }

    pub fn practiced_on(&self, date: NaiveDate) -> bool {
        self.last_practice_date == Some(date)
    }

    pub fn snapshot(&self) -> StreakSnapshot {
        StreakSnapshot {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            freeze_tokens_available: self.freeze_tokens_available,
        }
    }

    pub(crate) fn record_practice(&mut self, new_streak: u32, practice_date: NaiveDate) {
        self.current_streak = new_streak;
        self.longest_streak = self.longest_streak.max(new_streak);
        self.last_practice_date = Some(practice_date);
    }

    /// Adds tokens, clamped to `cap` when one is configured. Never lowers
    /// a balance that already exceeds the cap.
    pub(crate) fn grant_freeze_tokens(&mut self, tokens: u32, cap: Option<u32>) {
        let granted = self.freeze_tokens_available.saturating_add(tokens);
        self.freeze_tokens_available = match cap {
            Some(cap) => granted.min(cap.max(self.freeze_tokens_available)),
            None => granted,
        };
    }

    /// Returns false when there is no token to spend.
    pub(crate) fn consume_freeze_token(&mut self) -> bool {
        if self.freeze_tokens_available == 0 {
            return false;
        }
        self.freeze_tokens_available -= 1;
        true
    }

    pub(crate) fn break_streak(&mut self) {
        self.current_streak = 0;
    }
}
