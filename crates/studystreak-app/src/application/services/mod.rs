mod reminder_service;
mod scheduler;
mod streak_engine;
mod streak_sweep;


pub use reminder_service::ReminderService;
pub use scheduler::{ScheduleConfig, StreakScheduler};
pub use streak_engine::StreakEngine;
pub use streak_sweep::StreakSweepService;

pub(crate) use streak_engine::bounded;
