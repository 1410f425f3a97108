use chrono::{Duration, NaiveDate};

use super::aggregate::StreakRecord;
use super::policy::StreakPolicy;
use super::value_objects::{StreakEventType, StreakTransition};
use crate::shared::DomainError;

pub const INVALID_DATE_FUTURE: &str = "Invalid practice date (future)";
pub const INVALID_DATE_TOO_OLD: &str = "Invalid practice date (too old)";

/// Streak state machine.
///
/// Both entry points are pure: they take the current record and the
/// calendar dates involved and return the next record plus the outcome.
/// Nothing here touches storage.
pub struct StreakDomainService {
    policy: StreakPolicy,
}

impl StreakDomainService {
    pub fn new(policy: StreakPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &StreakPolicy {
        &self.policy
    }

    /// A practice date is accepted only for today or yesterday.
    pub fn validate_practice_date(
        today: NaiveDate,
        practice_date: NaiveDate,
    ) -> Result<(), DomainError> {
        if practice_date > today {
            return Err(DomainError::Validation(INVALID_DATE_FUTURE.to_string()));
        }
        if practice_date < today - Duration::days(1) {
            return Err(DomainError::Validation(INVALID_DATE_TOO_OLD.to_string()));
        }
        Ok(())
    }

    /// Apply a confirmed practice event.
    ///
    /// Continuability is decided by `current_streak` alone: a positive
    /// streak is extended whatever the gap since the last practice, since
    /// the reconcile step is responsible for freezing or zeroing it first.
    pub fn on_valid_practice(
        &self,
        record: &StreakRecord,
        today: NaiveDate,
        practice_date: NaiveDate,
    ) -> Result<StreakTransition, DomainError> {
        Self::validate_practice_date(today, practice_date)?;

        if let Some(last) = record.last_practice_date() {
            if last == practice_date {
                return Ok(StreakTransition::unchanged(
                    record,
                    StreakEventType::MaintainDay,
                    "already completed today",
                ));
            }
            // lastPracticeDate never moves backwards
            if practice_date < last {
                return Ok(StreakTransition::unchanged(
                    record,
                    StreakEventType::MaintainDay,
                    format!("practice on {} is already covered by {}", practice_date, last),
                ));
            }
        }

        let first_ever = record.last_practice_date().is_none();
        let (new_streak, event, message) = if first_ever {
            (1, StreakEventType::CompleteDay, "streak started".to_string())
        } else if record.current_streak() == 0 {
            (
                1,
                StreakEventType::ResetStreak,
                "streak was broken, starting over".to_string(),
            )
        } else {
            let next = record.current_streak().saturating_add(1);
            (
                next,
                StreakEventType::CompleteDay,
                format!("great work, {}-day streak", next),
            )
        };

        let cap = self.policy.max_freeze_tokens;
        let mut next = record.clone();

        if first_ever {
            next.grant_freeze_tokens(self.policy.starting_freeze_tokens, cap);
        }

        let milestone = self.policy.milestone_rule().evaluate(new_streak);
        if milestone.reached {
            next.grant_freeze_tokens(milestone.freeze_tokens_granted, cap);
        }

        next.record_practice(new_streak, practice_date);

        Ok(StreakTransition::updated(
            record,
            next,
            event,
            message,
            milestone.reached.then_some(milestone),
        ))
    }

    /// Resolve the gap between the last practice and `today`.
    pub fn reconcile_missed_day(&self, record: &StreakRecord, today: NaiveDate) -> StreakTransition {
        if record.current_streak() == 0 {
            return StreakTransition::unchanged(
                record,
                StreakEventType::NoActiveStreak,
                "no active streak to process",
            );
        }

        let Some(last) = record.last_practice_date() else {
            return StreakTransition::unchanged(
                record,
                StreakEventType::NoPracticeDate,
                "no practice date",
            );
        };

        if (today - last).num_days() <= 1 {
            return StreakTransition::unchanged(record, StreakEventType::StreakSafe, "streak is safe");
        }

        let mut next = record.clone();
        if next.consume_freeze_token() {
            let message = format!(
                "freeze token used, {}-day streak protected",
                record.current_streak()
            );
            StreakTransition::updated(record, next, StreakEventType::FreezeUsed, message, None)
        } else {
            next.break_streak();
            StreakTransition::updated(
                record,
                next,
                StreakEventType::StreakLost,
                "streak lost, start again today",
                None,
            )
        }
    }
}

impl Default for StreakDomainService {
    fn default() -> Self {
        Self::new(StreakPolicy::default())
    }
}
