//! # Booking Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALON_OPENING_HOUR=10                                              │
//! │     SALON_SOURCE=sqlite                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/salon-booking/booking.toml (Linux)                       │
//! │     ~/Library/Application Support/com.salon.booking/booking.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     09:00-18:45, 15-minute slots, in-memory demo catalog               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # booking.toml
//! [salon]
//! name = "Polished Nail Studio"
//!
//! [schedule]
//! opening_hour = 9
//! closing_hour = 18
//! slot_interval_minutes = 15
//!
//! [source]
//! kind = "sqlite"        # memory | sqlite
//! database_path = "/var/lib/salon/salon.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{BookingError, BookingResult};
use salon_core::{SlotSchedule, DEFAULT_CLOSING_HOUR, DEFAULT_OPENING_HOUR, SLOT_INTERVAL_MINUTES};

// =============================================================================
// Source Kind
// =============================================================================

/// Which `DataSource` backs the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Seeded demo catalog held in memory; nothing persists.
    #[default]
    Memory,
    /// SQLite file via salon-db.
    Sqlite,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Memory => write!(f, "memory"),
            SourceKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" | "demo" => Ok(SourceKind::Memory),
            "sqlite" | "db" => Ok(SourceKind::Sqlite),
            other => Err(BookingError::InvalidConfig(format!(
                "unknown source kind '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalonSettings {
    #[serde(default = "default_salon_name")]
    pub name: String,
}

fn default_salon_name() -> String {
    "Salon".to_string()
}

impl Default for SalonSettings {
    fn default() -> Self {
        SalonSettings {
            name: default_salon_name(),
        }
    }
}

/// Opening hours and slot width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// First hour with slots.
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u32,

    /// Last hour with slots (inclusive).
    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,

    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: u32,
}

fn default_opening_hour() -> u32 {
    DEFAULT_OPENING_HOUR
}

fn default_closing_hour() -> u32 {
    DEFAULT_CLOSING_HOUR
}

fn default_slot_interval() -> u32 {
    SLOT_INTERVAL_MINUTES
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        ScheduleSettings {
            opening_hour: default_opening_hour(),
            closing_hour: default_closing_hour(),
            slot_interval_minutes: default_slot_interval(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default)]
    pub kind: SourceKind,

    /// SQLite file; defaults to `salon.db` in the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete booking configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default)]
    pub salon: SalonSettings,

    #[serde(default)]
    pub schedule: ScheduleSettings,

    #[serde(default)]
    pub source: SourceSettings,
}

impl BookingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (booking.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> BookingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading booking config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load booking config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BookingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BookingError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BookingError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| BookingError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Booking config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BookingResult<()> {
        self.slot_schedule()?;

        if self.salon.name.trim().is_empty() {
            return Err(BookingError::InvalidConfig("salon name must not be empty".into()));
        }

        if let Some(path) = &self.source.database_path {
            if path.as_os_str().is_empty() {
                return Err(BookingError::InvalidConfig("database_path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// The validated slot schedule.
    pub fn slot_schedule(&self) -> BookingResult<SlotSchedule> {
        SlotSchedule::new(
            self.schedule.opening_hour,
            self.schedule.closing_hour,
            self.schedule.slot_interval_minutes,
        )
        .map_err(|e| BookingError::InvalidConfig(e.to_string()))
    }

    /// Configured SQLite path, or the platform default.
    pub fn database_path(&self) -> PathBuf {
        self.source.database_path.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("com", "salon", "booking")
                .map(|dirs| dirs.data_dir().join("salon.db"))
                .unwrap_or_else(|| PathBuf::from("salon.db"))
        })
    }

    /// Applies `SALON_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("SALON_NAME") {
            self.salon.name = name;
        }

        let hours = [
            ("SALON_OPENING_HOUR", &mut self.schedule.opening_hour),
            ("SALON_CLOSING_HOUR", &mut self.schedule.closing_hour),
            ("SALON_SLOT_INTERVAL", &mut self.schedule.slot_interval_minutes),
        ];
        for (key, target) in hours {
            if let Some(value) = var(key) {
                match value.trim().parse::<u32>() {
                    Ok(v) => {
                        debug!(key, value = v, "Overriding schedule from environment");
                        *target = v;
                    }
                    Err(_) => warn!(key, value = %value, "Ignoring non-numeric override"),
                }
            }
        }

        if let Some(kind) = var("SALON_SOURCE") {
            match kind.parse() {
                Ok(parsed) => {
                    debug!(source = %kind, "Overriding data source from environment");
                    self.source.kind = parsed;
                }
                Err(_) => warn!(source = %kind, "Unknown data source in environment"),
            }
        }

        if let Some(path) = var("SALON_DATABASE_PATH") {
            self.source.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "salon", "booking")
            .map(|dirs| dirs.config_dir().join("booking.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BookingConfig::default();
        assert_eq!(config.schedule.opening_hour, 9);
        assert_eq!(config.schedule.closing_hour, 18);
        assert_eq!(config.schedule.slot_interval_minutes, 15);
        assert_eq!(config.source.kind, SourceKind::Memory);
        assert_eq!(config.slot_schedule().unwrap(), SlotSchedule::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = BookingConfig::default();

        config.schedule.opening_hour = 19;
        assert!(config.validate().unwrap_err().is_config_error());

        config.schedule.opening_hour = 9;
        config.schedule.slot_interval_minutes = 0;
        assert!(config.validate().is_err());

        config.schedule.slot_interval_minutes = 30;
        config.salon.name = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BookingConfig = toml::from_str(
            r#"
            [schedule]
            opening_hour = 10

            [source]
            kind = "sqlite"
            "#,
        )
        .unwrap();

        assert_eq!(config.schedule.opening_hour, 10);
        assert_eq!(config.schedule.closing_hour, 18);
        assert_eq!(config.source.kind, SourceKind::Sqlite);
        assert_eq!(config.salon.name, "Salon");
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = BookingConfig::default();
        config.source.database_path = Some(PathBuf::from("/tmp/salon.db"));

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: BookingConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SALON_OPENING_HOUR", "10"),
            ("SALON_SLOT_INTERVAL", "thirty"),
            ("SALON_SOURCE", "sqlite"),
            ("SALON_DATABASE_PATH", "/data/salon.db"),
        ]
        .into_iter()
        .collect();

        let mut config = BookingConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.schedule.opening_hour, 10);
        assert_eq!(config.schedule.slot_interval_minutes, 15);
        assert_eq!(config.source.kind, SourceKind::Sqlite);
        assert_eq!(config.database_path(), PathBuf::from("/data/salon.db"));
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("SQLite".parse::<SourceKind>().unwrap(), SourceKind::Sqlite);
        assert_eq!("demo".parse::<SourceKind>().unwrap(), SourceKind::Memory);
        assert!("redis".parse::<SourceKind>().is_err());
    }
}
