use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use tracing::warn;

use crate::persistence::SqliteRepositoryBase;
use studystreak_domain::shared::{DomainError, UserId};
use studystreak_domain::streak::{
    ReminderCandidate, StreakRecord, StreakRepository, StreakStanding,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(FromRow)]
struct StreakRow {
    user_id: String,
    current_streak: i64,
    longest_streak: i64,
    last_practice_date: Option<String>,
    freeze_tokens_available: i64,
    version: i64,
}

impl StreakRow {
    fn try_into_record(self) -> Result<StreakRecord, DomainError> {
        let last_practice_date = self
            .last_practice_date
            .as_deref()
            .map(|raw| parse_date(&self.user_id, raw))
            .transpose()?;

        let current_streak = to_count(&self.user_id, "current_streak", self.current_streak)?;
        let longest_streak = to_count(&self.user_id, "longest_streak", self.longest_streak)?;
        if longest_streak < current_streak {
            warn!(
                user_id = %self.user_id,
                current_streak,
                longest_streak,
                "Stored longest streak below current streak, lifting it"
            );
        }

        StreakRecord::restore(
            UserId::from_string(&self.user_id),
            current_streak,
            longest_streak,
            last_practice_date,
            to_count(
                &self.user_id,
                "freeze_tokens_available",
                self.freeze_tokens_available,
            )?,
            self.version,
        )
    }
}

#[derive(FromRow)]
struct ReminderRow {
    user_id: String,
    email: String,
    full_name: String,
    current_streak: i64,
    freeze_tokens_available: i64,
}

impl ReminderRow {
    fn try_into_candidate(self) -> Result<ReminderCandidate, DomainError> {
        Ok(ReminderCandidate {
            current_streak: to_count(&self.user_id, "current_streak", self.current_streak)?,
            freeze_tokens_available: to_count(
                &self.user_id,
                "freeze_tokens_available",
                self.freeze_tokens_available,
            )?,
            user_id: UserId::from_string(&self.user_id),
            email: self.email,
            full_name: self.full_name,
        })
    }
}

#[derive(FromRow)]
struct StandingRow {
    user_id: String,
    full_name: String,
    current_streak: i64,
    longest_streak: i64,
}

impl StandingRow {
    fn try_into_standing(self) -> Result<StreakStanding, DomainError> {
        Ok(StreakStanding {
            current_streak: to_count(&self.user_id, "current_streak", self.current_streak)?,
            longest_streak: to_count(&self.user_id, "longest_streak", self.longest_streak)?,
            user_id: UserId::from_string(&self.user_id),
            full_name: self.full_name,
        })
    }
}

fn parse_date(user_id: &str, raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        DomainError::DataIntegrity(format!(
            "Invalid last_practice_date for user {}: {} ({})",
            user_id, raw, e
        ))
    })
}

fn to_count(user_id: &str, column: &str, value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::DataIntegrity(format!(
            "Column {} out of range for user {}: {}",
            column, user_id, value
        ))
    })
}

pub struct SqliteStreakRepository {
    base: SqliteRepositoryBase,
}

impl SqliteStreakRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }

    async fn insert(&self, record: &StreakRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO user_streaks (
                user_id,
                current_streak,
                longest_streak,
                last_practice_date,
                freeze_tokens_available,
                version,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
            ON CONFLICT(user_id) DO NOTHING
        "#;

        let result = self
            .base
            .execute(
                sqlx::query(query)
                    .bind(record.user_id().as_str())
                    .bind(record.current_streak() as i64)
                    .bind(record.longest_streak() as i64)
                    .bind(format_date(record.last_practice_date()))
                    .bind(record.freeze_tokens_available() as i64)
                    .bind(Utc::now()),
                "Insert streak record",
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConcurrencyConflict(format!(
                "Streak record for user {} was created concurrently",
                record.user_id()
            )));
        }

        Ok(())
    }

    async fn update(&self, record: &StreakRecord) -> Result<(), DomainError> {
        let query = r#"
            UPDATE user_streaks
            SET current_streak = ?2,
                longest_streak = ?3,
                last_practice_date = ?4,
                freeze_tokens_available = ?5,
                version = version + 1,
                updated_at = ?7
            WHERE user_id = ?1 AND version = ?6
        "#;

        let result = self
            .base
            .execute(
                sqlx::query(query)
                    .bind(record.user_id().as_str())
                    .bind(record.current_streak() as i64)
                    .bind(record.longest_streak() as i64)
                    .bind(format_date(record.last_practice_date()))
                    .bind(record.freeze_tokens_available() as i64)
                    .bind(record.version())
                    .bind(Utc::now()),
                "Update streak record",
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConcurrencyConflict(format!(
                "Streak record for user {} changed since version {}",
                record.user_id(),
                record.version()
            )));
        }

        Ok(())
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

#[async_trait]
impl StreakRepository for SqliteStreakRepository {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)")
            .bind(user_id.as_str())
            .fetch_one(self.base.pool())
            .await
            .map_err(|e| DomainError::Repository(format!("Check user exists: {e}")))?;

        Ok(exists != 0)
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<StreakRecord>, DomainError> {
        let query = r#"
            SELECT
                user_id,
                current_streak,
                longest_streak,
                last_practice_date,
                freeze_tokens_available,
                version
            FROM user_streaks
            WHERE user_id = ?1
        "#;

        let row: Option<StreakRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(user_id.as_str()),
                "Load streak record",
            )
            .await?;

        row.map(|r| r.try_into_record()).transpose()
    }

    async fn save(&self, record: &StreakRecord) -> Result<(), DomainError> {
        if record.is_persisted() {
            self.update(record).await
        } else {
            self.insert(record).await
        }
    }

    async fn find_due_for_reconcile(&self, today: NaiveDate) -> Result<Vec<UserId>, DomainError> {
        let yesterday = today - Duration::days(1);
        let query = r#"
            SELECT user_id
            FROM user_streaks
            WHERE current_streak > 0
              AND last_practice_date IS NOT NULL
              AND last_practice_date < ?1
            ORDER BY user_id ASC
        "#;

        let ids: Vec<String> = sqlx::query_scalar(query)
            .bind(yesterday.format(DATE_FORMAT).to_string())
            .fetch_all(self.base.pool())
            .await
            .map_err(|e| DomainError::Repository(format!("Find users due for reconcile: {e}")))?;

        Ok(ids.into_iter().map(|id| UserId::from_string(&id)).collect())
    }

    async fn find_reminder_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>, DomainError> {
        let query = r#"
            SELECT
                s.user_id AS user_id,
                u.email AS email,
                u.full_name AS full_name,
                s.current_streak AS current_streak,
                s.freeze_tokens_available AS freeze_tokens_available
            FROM user_streaks s
            JOIN users u ON u.id = s.user_id
            WHERE s.current_streak > 0
              AND (s.last_practice_date IS NULL OR s.last_practice_date < ?1)
            ORDER BY s.current_streak DESC, s.user_id ASC
        "#;

        let rows: Vec<ReminderRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(today.format(DATE_FORMAT).to_string()),
                "Find reminder candidates",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_candidate()).collect()
    }

    async fn find_top_streaks(&self, limit: u32) -> Result<Vec<StreakStanding>, DomainError> {
        let query = r#"
            SELECT
                s.user_id AS user_id,
                u.full_name AS full_name,
                s.current_streak AS current_streak,
                s.longest_streak AS longest_streak
            FROM user_streaks s
            JOIN users u ON u.id = s.user_id
            WHERE s.current_streak > 0
            ORDER BY s.current_streak DESC, s.longest_streak DESC, s.user_id ASC
            LIMIT ?1
        "#;

        let rows: Vec<StandingRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(limit as i64),
                "Find top streaks",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_standing()).collect()
    }
}
