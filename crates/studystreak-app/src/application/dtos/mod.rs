mod streak_dto;

pub use streak_dto::{
    LeaderboardEntryDto, ReminderDto, StreakResultDto, StreakSummaryDto, SweepReport,
    INTERNAL_ERROR, USER_NOT_FOUND,
};
