use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub reached: bool,
    pub value: u32,
    pub freeze_tokens_granted: u32,
}

/// A milestone is every positive multiple of `interval` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneRule {
    interval: u32,
    tokens_per_milestone: u32,
}

impl MilestoneRule {
    pub fn new(interval: u32, tokens_per_milestone: u32) -> Self {
        Self {
            interval,
            tokens_per_milestone,
        }
    }

    pub fn is_milestone(&self, streak: u32) -> bool {
        self.interval > 0 && streak > 0 && streak % self.interval == 0
    }

    pub fn evaluate(&self, new_streak: u32) -> Milestone {
        if self.is_milestone(new_streak) {
            Milestone {
                reached: true,
                value: new_streak,
                freeze_tokens_granted: self.tokens_per_milestone,
            }
        } else {
            Milestone {
                reached: false,
                value: 0,
                freeze_tokens_granted: 0,
            }
        }
    }

    /// Highest milestone at or below `streak`.
    pub fn last_reached(&self, streak: u32) -> Option<u32> {
        if self.interval == 0 {
            return None;
        }
        let last = streak / self.interval * self.interval;
        (last > 0).then_some(last)
    }

    /// Lowest milestone strictly above `streak`.
    pub fn next_after(&self, streak: u32) -> Option<u32> {
        if self.interval == 0 {
            return None;
        }
        (streak / self.interval)
            .checked_add(1)
            .and_then(|n| n.checked_mul(self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_positive_multiples_of_seven_are_milestones() {
        let rule = MilestoneRule::new(7, 1);

        for streak in 0..=100u32 {
            let milestone = rule.evaluate(streak);
            let expected = streak > 0 && streak % 7 == 0;
            assert_eq!(milestone.reached, expected, "streak {}", streak);
            if expected {
                assert_eq!(milestone.value, streak);
                assert_eq!(milestone.freeze_tokens_granted, 1);
            } else {
                assert_eq!(milestone.freeze_tokens_granted, 0);
            }
        }
    }

    #[test]
    fn test_last_and_next_milestone() {
        let rule = MilestoneRule::new(7, 1);

        assert_eq!(rule.last_reached(0), None);
        assert_eq!(rule.next_after(0), Some(7));
        assert_eq!(rule.last_reached(6), None);
        assert_eq!(rule.last_reached(7), Some(7));
        assert_eq!(rule.next_after(7), Some(14));
        assert_eq!(rule.last_reached(20), Some(14));
        assert_eq!(rule.next_after(20), Some(21));
    }

    #[test]
    fn test_zero_interval_never_triggers() {
        let rule = MilestoneRule::new(0, 3);
        assert!(!rule.evaluate(0).reached);
        assert!(!rule.evaluate(7).reached);
        assert_eq!(rule.next_after(5), None);
    }

    #[test]
    fn test_next_milestone_does_not_overflow() {
        let rule = MilestoneRule::new(7, 1);
        assert_eq!(rule.next_after(u32::MAX), None);
    }
}
