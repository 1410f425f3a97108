use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::queries::StreakQueries;
use crate::application::services::{
    ReminderService, ScheduleConfig, StreakEngine, StreakSweepService,
};

pub struct Services {
    pub engine: Arc<StreakEngine>,
    pub sweep: Arc<StreakSweepService>,
    pub reminders: Arc<ReminderService>,
}

pub struct AppState {
    pub pool: Arc<SqlitePool>,
    pub services: Services,
    pub queries: Arc<StreakQueries>,
    pub schedule: ScheduleConfig,
}
