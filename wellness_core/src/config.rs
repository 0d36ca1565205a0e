//! Configuration file support for the wellness tools.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wellness/config.toml`.

use crate::streak::StreakAnchor;
use crate::window::{parse_timezone, MAX_WINDOW_DAYS};
use crate::{Error, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub goals: GoalsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// JSON-lines file holding every subject's log entries
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("logs.jsonl")
    }
}

/// Metric computation parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// IANA timezone used for calendar-day bucketing
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_window_days")]
    pub window_days: i64,

    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub streak_anchor: StreakAnchor,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            window_days: default_window_days(),
            trend_threshold: default_trend_threshold(),
            top_n: default_top_n(),
            streak_anchor: StreakAnchor::default(),
        }
    }
}

impl EngineConfig {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(Some(&self.timezone))
    }
}

/// Per-subject targets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_sleep_target_hours")]
    pub sleep_target_hours: f64,

    #[serde(default = "default_sleep_target_quality")]
    pub sleep_target_quality: f64,

    #[serde(default = "default_max_sleep_debt_hours")]
    pub max_sleep_debt_hours: f64,

    #[serde(default = "default_weekly_exercise_minutes")]
    pub weekly_exercise_minutes: f64,

    #[serde(default = "default_weekly_exercise_sessions")]
    pub weekly_exercise_sessions: f64,

    #[serde(default = "default_target_average_severity")]
    pub target_average_severity: f64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            sleep_target_hours: default_sleep_target_hours(),
            sleep_target_quality: default_sleep_target_quality(),
            max_sleep_debt_hours: default_max_sleep_debt_hours(),
            weekly_exercise_minutes: default_weekly_exercise_minutes(),
            weekly_exercise_sessions: default_weekly_exercise_sessions(),
            target_average_severity: default_target_average_severity(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("wellness")
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_window_days() -> i64 {
    crate::window::MONTH_DAYS
}

fn default_trend_threshold() -> f64 {
    crate::trend::DEFAULT_TREND_THRESHOLD
}

fn default_top_n() -> usize {
    crate::frequency::DEFAULT_TOP_N
}

fn default_sleep_target_hours() -> f64 {
    crate::sleep_debt::DEFAULT_TARGET_HOURS
}

fn default_sleep_target_quality() -> f64 {
    4.0
}

fn default_max_sleep_debt_hours() -> f64 {
    5.0
}

fn default_weekly_exercise_minutes() -> f64 {
    150.0
}

fn default_weekly_exercise_sessions() -> f64 {
    3.0
}

fn default_target_average_severity() -> f64 {
    2.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("wellness").join("config.toml")
    }

    /// Reject values the engine would refuse at computation time
    pub fn validate(&self) -> Result<()> {
        self.engine
            .tz()
            .map_err(|e| Error::Config(e.to_string()))?;

        if !(1..=MAX_WINDOW_DAYS).contains(&self.engine.window_days) {
            return Err(Error::Config(format!(
                "engine.window_days must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS, self.engine.window_days
            )));
        }
        if !(self.engine.trend_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "engine.trend_threshold must be non-negative, got {}",
                self.engine.trend_threshold
            )));
        }

        let goals = [
            ("goals.sleep_target_hours", self.goals.sleep_target_hours),
            ("goals.sleep_target_quality", self.goals.sleep_target_quality),
            ("goals.weekly_exercise_minutes", self.goals.weekly_exercise_minutes),
            ("goals.weekly_exercise_sessions", self.goals.weekly_exercise_sessions),
            ("goals.target_average_severity", self.goals.target_average_severity),
        ];
        for (name, value) in goals {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.goals.max_sleep_debt_hours >= 0.0) {
            return Err(Error::Config(format!(
                "goals.max_sleep_debt_hours must be non-negative, got {}",
                self.goals.max_sleep_debt_hours
            )));
        }

        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
