use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Offset of the platform's calendar day from UTC.
pub const STUDY_UTC_OFFSET_HOURS: i32 = 7;

/// Source of "today" for streak decisions.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Calendar date at a fixed UTC offset, independent of the host timezone.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: Duration,
}

impl OffsetClock {
    pub fn new(offset_hours: i32) -> Self {
        Self {
            offset: Duration::hours(offset_hours as i64),
        }
    }

    pub fn study_time() -> Self {
        Self::new(STUDY_UTC_OFFSET_HOURS)
    }

    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        (instant + self.offset).date_naive()
    }
}

impl Default for OffsetClock {
    fn default() -> Self {
        Self::study_time()
    }
}

impl Clock for OffsetClock {
    fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
