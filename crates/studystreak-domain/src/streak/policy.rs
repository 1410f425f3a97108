use serde::{Deserialize, Serialize};

use super::milestone::MilestoneRule;
use crate::shared::DomainError;

/// Tunable streak rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakPolicy {
    /// Days between milestones
    pub milestone_interval: u32,
    /// Freeze tokens granted per milestone
    pub tokens_per_milestone: u32,
    /// Freeze tokens granted on a user's first-ever practice
    pub starting_freeze_tokens: u32,
    /// Upper bound on the token balance; `None` means uncapped
    pub max_freeze_tokens: Option<u32>,
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self {
            milestone_interval: 7,
            tokens_per_milestone: 1,
            starting_freeze_tokens: 1,
            max_freeze_tokens: None,
        }
    }
}

impl StreakPolicy {
    pub fn milestone_rule(&self) -> MilestoneRule {
        MilestoneRule::new(self.milestone_interval, self.tokens_per_milestone)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.milestone_interval == 0 {
            return Err(DomainError::Validation(
                "Milestone interval must be at least 1 day".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = StreakPolicy::default();
        assert_eq!(policy.milestone_interval, 7);
        assert_eq!(policy.tokens_per_milestone, 1);
        assert_eq!(policy.starting_freeze_tokens, 1);
        assert!(policy.max_freeze_tokens.is_none());
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let policy = StreakPolicy {
            milestone_interval: 0,
            ..StreakPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let policy: StreakPolicy = serde_json::from_str(r#"{"max_freeze_tokens": 5}"#).unwrap();
        assert_eq!(policy.max_freeze_tokens, Some(5));
        assert_eq!(policy.milestone_interval, 7);
    }
}
