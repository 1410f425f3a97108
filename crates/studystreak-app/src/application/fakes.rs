use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use studystreak_domain::shared::{DomainError, UserId};
use studystreak_domain::streak::{
    ReminderCandidate, StreakRecord, StreakRepository, StreakStanding,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    date(2025, 6, 15)
}

pub fn days_ago(n: i64) -> NaiveDate {
    today() - Duration::days(n)
}

struct UserRow {
    email: String,
    full_name: String,
}

/// In-memory store with the same versioning rules as the SQLite one.
pub struct FakeStreakRepository {
    users: tokio::sync::RwLock<HashMap<String, UserRow>>,
    records: tokio::sync::RwLock<HashMap<String, StreakRecord>>,
    saves: AtomicUsize,
}

impl FakeStreakRepository {
    pub fn new() -> Self {
        Self {
            users: tokio::sync::RwLock::new(HashMap::new()),
            records: tokio::sync::RwLock::new(HashMap::new()),
            saves: AtomicUsize::new(0),
        }
    }

    pub async fn add_user(&self, id: &str, full_name: &str) -> UserId {
        self.users.write().await.insert(
            id.to_string(),
            UserRow {
                email: format!("{}@example.com", id),
                full_name: full_name.to_string(),
            },
        );
        UserId::from_string(id)
    }

    /// Seed a user together with a stored record.
    pub async fn add_user_with_streak(
        &self,
        id: &str,
        current: u32,
        longest: u32,
        last: Option<NaiveDate>,
        tokens: u32,
    ) -> UserId {
        let user_id = self.add_user(id, &id.to_uppercase()).await;
        let record = StreakRecord::restore(user_id.clone(), current, longest, last, tokens, 1)
            .expect("valid seed record");
        self.records.write().await.insert(id.to_string(), record);
        user_id
    }

    pub async fn stored(&self, user_id: &UserId) -> Option<StreakRecord> {
        self.records.read().await.get(user_id.as_str()).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StreakRepository for FakeStreakRepository {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self.users.read().await.contains_key(user_id.as_str()))
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<StreakRecord>, DomainError> {
        Ok(self.records.read().await.get(user_id.as_str()).cloned())
    }

    async fn save(&self, record: &StreakRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let stored_version = records
            .get(record.user_id().as_str())
            .map(|r| r.version())
            .unwrap_or(0);

        if stored_version != record.version() {
            return Err(DomainError::ConcurrencyConflict(format!(
                "expected version {}, found {}",
                record.version(),
                stored_version
            )));
        }

        let next = StreakRecord::restore(
            record.user_id().clone(),
            record.current_streak(),
            record.longest_streak(),
            record.last_practice_date(),
            record.freeze_tokens_available(),
            record.version() + 1,
        )?;
        records.insert(record.user_id().as_str().to_string(), next);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_due_for_reconcile(&self, today: NaiveDate) -> Result<Vec<UserId>, DomainError> {
        let yesterday = today - Duration::days(1);
        let records = self.records.read().await;
        let mut due: Vec<UserId> = records
            .values()
            .filter(|r| r.current_streak() > 0)
            .filter(|r| r.last_practice_date().is_some_and(|d| d < yesterday))
            .map(|r| r.user_id().clone())
            .collect();
        due.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(due)
    }

    async fn find_reminder_candidates(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>, DomainError> {
        let users = self.users.read().await;
        let records = self.records.read().await;
        let mut candidates: Vec<ReminderCandidate> = records
            .values()
            .filter(|r| r.current_streak() > 0)
            .filter(|r| r.last_practice_date().map_or(true, |d| d < today))
            .filter_map(|r| {
                users.get(r.user_id().as_str()).map(|u| ReminderCandidate {
                    user_id: r.user_id().clone(),
                    email: u.email.clone(),
                    full_name: u.full_name.clone(),
                    current_streak: r.current_streak(),
                    freeze_tokens_available: r.freeze_tokens_available(),
                })
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.current_streak
                .cmp(&a.current_streak)
                .then_with(|| a.user_id.as_str().cmp(b.user_id.as_str()))
        });
        Ok(candidates)
    }

    async fn find_top_streaks(&self, limit: u32) -> Result<Vec<StreakStanding>, DomainError> {
        let users = self.users.read().await;
        let records = self.records.read().await;
        let mut standings: Vec<StreakStanding> = records
            .values()
            .filter(|r| r.current_streak() > 0)
            .map(|r| StreakStanding {
                user_id: r.user_id().clone(),
                full_name: users
                    .get(r.user_id().as_str())
                    .map(|u| u.full_name.clone())
                    .unwrap_or_default(),
                current_streak: r.current_streak(),
                longest_streak: r.longest_streak(),
            })
            .collect();
        standings.sort_by(|a, b| {
            b.current_streak
                .cmp(&a.current_streak)
                .then_with(|| b.longest_streak.cmp(&a.longest_streak))
                .then_with(|| a.user_id.as_str().cmp(b.user_id.as_str()))
        });
        standings.truncate(limit as usize);
        Ok(standings)
    }
}
