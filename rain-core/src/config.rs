use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::ConfigError,
    model::{Coordinates, TimeOfDay, TimeWindow},
};

pub const DEFAULT_RAIN_THRESHOLD: u8 = 30;

pub const HOME_LAT: &str = "HOME_LAT";
pub const HOME_LON: &str = "HOME_LON";
pub const WORK_LAT: &str = "WORK_LAT";
pub const WORK_LON: &str = "WORK_LON";
pub const DEPARTURE_TIME: &str = "DEPARTURE_TIME";
pub const ARRIVAL_TIME: &str = "ARRIVAL_TIME";
pub const RETURN_DEPARTURE_TIME: &str = "RETURN_DEPARTURE_TIME";
pub const RETURN_ARRIVAL_TIME: &str = "RETURN_ARRIVAL_TIME";
pub const OWM_API_KEY: &str = "OWM_API_KEY";
pub const DISCORD_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const RAIN_THRESHOLD: &str = "RAIN_THRESHOLD";
pub const DEBUG: &str = "DEBUG";

/// How chatty logging should be for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Debug,
}

/// Validated settings for one run. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub home: Coordinates,
    pub work: Coordinates,
    /// Home to work.
    pub outbound: TimeWindow,
    /// Work to home.
    pub inbound: TimeWindow,
    pub owm_api_key: String,
    pub discord_webhook_url: String,
    /// Whole percent; a leg at or above it triggers the rain alert.
    pub rain_threshold: u8,
    pub debug: bool,
}

impl Config {
    /// Loads the TOML file (explicit `path`, else the platform default if it
    /// exists), overlays process environment variables and validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut raw = match path {
            Some(path) => RawConfig::from_toml_file(path)?,
            None => match Self::config_file_path() {
                Some(default) if default.exists() => RawConfig::from_toml_file(&default)?,
                // First run, or a sandbox without a home directory: env only.
                _ => RawConfig::default(),
            },
        };

        raw.apply_env(|name| std::env::var(name).ok())?;
        raw.validate()
    }

    /// Default location of `config.toml`, if the platform has a config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "will-it-rain", "will-it-rain")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn verbosity(&self) -> Verbosity {
        if self.debug { Verbosity::Debug } else { Verbosity::Normal }
    }
}

/// Settings as read from disk and environment, before validation.
///
/// Example TOML:
/// ```toml
/// home_lat = 48.8566
/// home_lon = 2.3522
/// work_lat = 48.8606
/// work_lon = 2.3376
/// departure_time = "8:30"
/// arrival_time = "9:00"
/// return_departure_time = "17:45"
/// return_arrival_time = "18:15"
/// owm_api_key = "..."
/// discord_webhook_url = "https://discord.com/api/webhooks/..."
/// rain_threshold = 40
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub home_lat: Option<f64>,
    pub home_lon: Option<f64>,
    pub work_lat: Option<f64>,
    pub work_lon: Option<f64>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub return_departure_time: Option<String>,
    pub return_arrival_time: Option<String>,
    pub owm_api_key: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub rain_threshold: Option<i64>,
    pub debug: Option<bool>,
}

impl RawConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields with any non-empty variable `lookup` returns.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let number = |name: &'static str| -> Result<Option<f64>, ConfigError> {
            var(name)
                .map(|raw| {
                    raw.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .ok_or(ConfigError::InvalidNumber { name, value: raw })
                })
                .transpose()
        };

        if let Some(v) = number(HOME_LAT)? {
            self.home_lat = Some(v);
        }
        if let Some(v) = number(HOME_LON)? {
            self.home_lon = Some(v);
        }
        if let Some(v) = number(WORK_LAT)? {
            self.work_lat = Some(v);
        }
        if let Some(v) = number(WORK_LON)? {
            self.work_lon = Some(v);
        }

        let text = |name: &str, slot: &mut Option<String>| {
            if let Some(v) = var(name) {
                *slot = Some(v);
            }
        };
        text(DEPARTURE_TIME, &mut self.departure_time);
        text(ARRIVAL_TIME, &mut self.arrival_time);
        text(RETURN_DEPARTURE_TIME, &mut self.return_departure_time);
        text(RETURN_ARRIVAL_TIME, &mut self.return_arrival_time);
        text(OWM_API_KEY, &mut self.owm_api_key);
        text(DISCORD_WEBHOOK_URL, &mut self.discord_webhook_url);

        if let Some(raw) = var(RAIN_THRESHOLD) {
            let value = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidThreshold { value: raw.clone() })?;
            self.rain_threshold = Some(value);
        }

        if let Some(raw) = var(DEBUG) {
            self.debug = Some(raw == "true");
        }

        Ok(())
    }

    /// Checks every required field. Times are parsed here.
    pub fn validate(self) -> Result<Config, ConfigError> {
        fn required<T>(value: Option<T>, name: &'static str) -> Result<T, ConfigError> {
            value.ok_or(ConfigError::Missing { name })
        }

        fn time(value: Option<String>, name: &'static str) -> Result<TimeOfDay, ConfigError> {
            let raw = required(value.filter(|v| !v.is_empty()), name)?;
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTime { name, value: raw })
        }

        fn text(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
            required(value.filter(|v| !v.trim().is_empty()), name)
        }

        let home = Coordinates {
            lat: required(self.home_lat, HOME_LAT)?,
            lon: required(self.home_lon, HOME_LON)?,
        };
        let work = Coordinates {
            lat: required(self.work_lat, WORK_LAT)?,
            lon: required(self.work_lon, WORK_LON)?,
        };

        let outbound = TimeWindow::new(
            time(self.departure_time, DEPARTURE_TIME)?,
            time(self.arrival_time, ARRIVAL_TIME)?,
        );
        let inbound = TimeWindow::new(
            time(self.return_departure_time, RETURN_DEPARTURE_TIME)?,
            time(self.return_arrival_time, RETURN_ARRIVAL_TIME)?,
        );

        let owm_api_key = text(self.owm_api_key, OWM_API_KEY)?;
        let discord_webhook_url = text(self.discord_webhook_url, DISCORD_WEBHOOK_URL)?;

        let rain_threshold = match self.rain_threshold {
            None => DEFAULT_RAIN_THRESHOLD,
            Some(v) => u8::try_from(v)
                .ok()
                .filter(|v| *v <= 100)
                .ok_or(ConfigError::InvalidThreshold { value: v.to_string() })?,
        };

        Ok(Config {
            home,
            work,
            outbound,
            inbound,
            owm_api_key,
            discord_webhook_url,
            rain_threshold,
            debug: self.debug.unwrap_or(false),
        })
    }
}
