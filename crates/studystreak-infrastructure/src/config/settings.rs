use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use studystreak_domain::streak::{StreakPolicy, STUDY_UTC_OFFSET_HOURS};
use tracing::{info, warn};

pub const ENV_DB_PATH: &str = "STUDYSTREAK_DB_PATH";
pub const ENV_LOG_DIR: &str = "STUDYSTREAK_LOG_DIR";
pub const ENV_UTC_OFFSET: &str = "STUDYSTREAK_UTC_OFFSET_HOURS";

/// Runtime configuration, read from an optional JSON file and then
/// overridden from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_to_console: bool,
    /// Offset of the platform's calendar day from UTC
    pub utc_offset_hours: i32,
    pub policy: StreakPolicy,
    /// Upper bound for a single store call
    pub store_timeout_ms: u64,
    /// Load-decide-save attempts before a conflict is reported
    pub max_save_attempts: u32,
    /// Cron expressions are evaluated in UTC
    pub reconcile_cron: String,
    pub reminder_cron: String,
    /// Pause between users during the reconcile sweep
    pub sweep_pause_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studystreak");

        Self {
            database_path: data_dir.join("studystreak.db"),
            log_dir: data_dir.join("logs"),
            log_to_console: false,
            utc_offset_hours: STUDY_UTC_OFFSET_HOURS,
            policy: StreakPolicy::default(),
            store_timeout_ms: 10_000,
            max_save_attempts: 3,
            // 00:05 and 21:00 at UTC+7
            reconcile_cron: "0 5 17 * * *".to_string(),
            reminder_cron: "0 0 14 * * *".to_string(),
            sweep_pause_ms: 50,
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given and present), then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings file {}", path.display()))?;
                let parsed: Settings = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid settings file {}", path.display()))?;
                info!("Loaded settings from {}", path.display());
                parsed
            }
            Some(path) => {
                warn!("Settings file {} not found, using defaults", path.display());
                Settings::default()
            }
            None => Settings::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_UTC_OFFSET) {
            self.utc_offset_hours = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value: {}", ENV_UTC_OFFSET, raw))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(-14..=14).contains(&self.utc_offset_hours) {
            bail!(
                "utc_offset_hours must be between -14 and 14, got {}",
                self.utc_offset_hours
            );
        }
        if self.max_save_attempts == 0 {
            bail!("max_save_attempts must be at least 1");
        }
        if self.store_timeout_ms == 0 {
            bail!("store_timeout_ms must be positive");
        }
        self.policy
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid streak policy: {}", e))?;
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn sweep_pause(&self) -> Duration {
        Duration::from_millis(self.sweep_pause_ms)
    }
}
