use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use studystreak_domain::streak::{
    ReminderCandidate, StreakEventType, StreakSnapshot, StreakStanding, StreakTransition,
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const INTERNAL_ERROR: &str = "Internal error";

/// Result of a practice or reconcile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResultDto {
    pub success: bool,
    pub event_type: Option<StreakEventType>,
    pub message: String,
    pub milestone_reached: bool,
    pub milestone_value: Option<u32>,
    pub summary: Option<StreakSnapshot>,
}

impl StreakResultDto {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            event_type: None,
            message: message.into(),
            milestone_reached: false,
            milestone_value: None,
            summary: None,
        }
    }
}

impl From<&StreakTransition> for StreakResultDto {
    fn from(transition: &StreakTransition) -> Self {
        let milestone = transition.milestone().filter(|m| m.reached);
        Self {
            success: true,
            event_type: Some(transition.event()),
            message: transition.message().to_string(),
            milestone_reached: milestone.is_some(),
            milestone_value: milestone.map(|m| m.value),
            summary: Some(transition.record().snapshot()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummaryDto {
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub freeze_tokens_available: u32,
    pub last_practice_date: Option<String>, // YYYY-MM-DD
    pub today_completed: bool,
    pub last_milestone: Option<u32>,
    pub next_milestone: Option<u32>,
    pub days_to_next_milestone: Option<u32>,
}

/// Counts from one reconcile sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub date: NaiveDate,
    pub total: usize,
    pub succeeded: usize,
    pub freeze_used: usize,
    pub streak_lost: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

impl SweepReport {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total: 0,
            succeeded: 0,
            freeze_used: 0,
            streak_lost: 0,
            failed: 0,
            elapsed_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDto {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub current_streak: u32,
    pub freeze_tokens_available: u32,
    pub message: String,
}

impl ReminderDto {
    pub fn new(candidate: ReminderCandidate, message: String) -> Self {
        Self {
            user_id: candidate.user_id.as_str().to_string(),
            email: candidate.email,
            full_name: candidate.full_name,
            current_streak: candidate.current_streak,
            freeze_tokens_available: candidate.freeze_tokens_available,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntryDto {
    pub rank: usize,
    pub user_id: String,
    pub full_name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl LeaderboardEntryDto {
    pub fn new(rank: usize, standing: StreakStanding) -> Self {
        Self {
            rank,
            user_id: standing.user_id.as_str().to_string(),
            full_name: standing.full_name,
            current_streak: standing.current_streak,
            longest_streak: standing.longest_streak,
        }
    }
}
