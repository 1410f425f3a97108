mod aggregate;
mod clock;
mod domain_service;
mod milestone;
mod policy;
mod reminder;
mod repository;
mod value_objects;


pub use aggregate::StreakRecord;
pub use clock::{Clock, FixedClock, OffsetClock, STUDY_UTC_OFFSET_HOURS};
pub use domain_service::{StreakDomainService, INVALID_DATE_FUTURE, INVALID_DATE_TOO_OLD};
pub use milestone::{Milestone, MilestoneRule};
pub use policy::StreakPolicy;
pub use reminder::compose_reminder_message;
pub use repository::StreakRepository;
pub use value_objects::{
    ReminderCandidate, StreakEventType, StreakSnapshot, StreakStanding, StreakTransition,
};
