use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::grid::DEFAULT_DAY_TARGET_MINUTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    #[default]
    List,        // Flat list of the current level's work orders
    Schedule,    // Weekly timesheet grid
}

/// Engine tuning knobs, persisted as JSON in the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_day_target_minutes")]
    pub day_target_minutes: i32,
    #[serde(default = "default_schedule_start_hour")]
    pub schedule_start_hour: u8,
    #[serde(default = "default_schedule_end_hour")]
    pub schedule_end_hour: u8,
    /// Show Sat/Sun columns even when they hold no entries.
    #[serde(default)]
    pub always_show_weekends: bool,
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Simulated latency for deferred save/delete, in milliseconds.
    #[serde(default = "default_save_latency_ms")]
    pub save_latency_ms: u64,
}

fn default_day_target_minutes() -> i32 {
    DEFAULT_DAY_TARGET_MINUTES
}

fn default_schedule_start_hour() -> u8 {
    6  // 6am
}

fn default_schedule_end_hour() -> u8 {
    20  // 8pm
}

fn default_save_latency_ms() -> u64 {
    400
}

impl Default for Config {
    fn default() -> Self {
        Self {
            day_target_minutes: DEFAULT_DAY_TARGET_MINUTES,
            schedule_start_hour: 6,
            schedule_end_hour: 20,
            always_show_weekends: false,
            view_mode: ViewMode::List,
            save_latency_ms: 400,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "workgrid", "workgrid")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }
}
