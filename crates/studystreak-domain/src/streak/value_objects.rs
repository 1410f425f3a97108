use serde::{Deserialize, Serialize};

use super::aggregate::StreakRecord;
use super::milestone::Milestone;
use crate::shared::UserId;

/// Outcome of a streak decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreakEventType {
    NoActiveStreak,
    NoPracticeDate,
    StreakSafe,
    MaintainDay,
    CompleteDay,
    ResetStreak,
    FreezeUsed,
    StreakLost,
}

impl StreakEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakEventType::NoActiveStreak => "no_active_streak",
            StreakEventType::NoPracticeDate => "no_practice_date",
            StreakEventType::StreakSafe => "streak_safe",
            StreakEventType::MaintainDay => "maintain_day",
            StreakEventType::CompleteDay => "complete_day",
            StreakEventType::ResetStreak => "reset_streak",
            StreakEventType::FreezeUsed => "freeze_used",
            StreakEventType::StreakLost => "streak_lost",
        }
    }
}

impl std::fmt::Display for StreakEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters exposed to callers after a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub freeze_tokens_available: u32,
}

/// Result of running the state machine against one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakTransition {
    record: StreakRecord,
    event: StreakEventType,
    message: String,
    milestone: Option<Milestone>,
    changed: bool,
}

impl StreakTransition {
    pub(crate) fn unchanged(
        record: &StreakRecord,
        event: StreakEventType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            record: record.clone(),
            event,
            message: message.into(),
            milestone: None,
            changed: false,
        }
    }

    pub(crate) fn updated(
        before: &StreakRecord,
        record: StreakRecord,
        event: StreakEventType,
        message: impl Into<String>,
        milestone: Option<Milestone>,
    ) -> Self {
        let changed = &record != before;
        Self {
            record,
            event,
            message: message.into(),
            milestone,
            changed,
        }
    }

    pub fn record(&self) -> &StreakRecord {
        &self.record
    }

    pub fn into_record(self) -> StreakRecord {
        self.record
    }

    pub fn event(&self) -> StreakEventType {
        self.event
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn milestone(&self) -> Option<&Milestone> {
        self.milestone.as_ref()
    }

    /// False for business no-ops; the store need not be written.
    pub fn is_changed(&self) -> bool {
        self.changed
    }
}

/// A user with an active streak who has not practised yet today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderCandidate {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub current_streak: u32,
    pub freeze_tokens_available: u32,
}

/// One row of the streak leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStanding {
    pub user_id: UserId,
    pub full_name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
}
