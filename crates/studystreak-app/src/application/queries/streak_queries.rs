use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::application::dtos::{LeaderboardEntryDto, StreakSummaryDto};
use crate::application::services::bounded;
use studystreak_domain::shared::{DomainError, UserId};
use studystreak_domain::streak::{Clock, MilestoneRule, StreakRecord, StreakRepository};

const MAX_LEADERBOARD_SIZE: u32 = 100;

/// Read-side views over streak records. Never writes.
pub struct StreakQueries {
    repo: Arc<dyn StreakRepository>,
    clock: Arc<dyn Clock>,
    milestones: MilestoneRule,
    store_timeout: Duration,
}

impl StreakQueries {
    pub fn new(
        repo: Arc<dyn StreakRepository>,
        clock: Arc<dyn Clock>,
        milestones: MilestoneRule,
        store_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            clock,
            milestones,
            store_timeout,
        }
    }

    pub async fn get_summary(&self, user_id: &UserId) -> Result<StreakSummaryDto, DomainError> {
        let exists = bounded(
            self.store_timeout,
            "check user exists",
            self.repo.user_exists(user_id),
        )
        .await?;
        if !exists {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }

        let record = bounded(
            self.store_timeout,
            "load streak record",
            self.repo.load(user_id),
        )
        .await?
        .unwrap_or_else(|| StreakRecord::new(user_id.clone()));

        let today = self.clock.today();
        let current = record.current_streak();
        let next_milestone = self.milestones.next_after(current);

        let dto = StreakSummaryDto {
            user_id: user_id.as_str().to_string(),
            current_streak: current,
            longest_streak: record.longest_streak(),
            freeze_tokens_available: record.freeze_tokens_available(),
            last_practice_date: record
                .last_practice_date()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            today_completed: record.practiced_on(today),
            last_milestone: self.milestones.last_reached(current),
            next_milestone,
            days_to_next_milestone: next_milestone.map(|next| next - current),
        };

        debug!(
            "[streak] summary user_id={} current={} next_milestone={:?}",
            dto.user_id, dto.current_streak, dto.next_milestone
        );

        Ok(dto)
    }

    /// Top streak holders, ranked from 1.
    pub async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntryDto>, DomainError> {
        if limit == 0 {
            return Err(DomainError::Validation(
                "Leaderboard limit must be at least 1".to_string(),
            ));
        }

        let standings = bounded(
            self.store_timeout,
            "load leaderboard",
            self.repo.find_top_streaks(limit.min(MAX_LEADERBOARD_SIZE)),
        )
        .await?;

        Ok(standings
            .into_iter()
            .enumerate()
            .map(|(index, standing)| LeaderboardEntryDto::new(index + 1, standing))
            .collect())
    }
}
