use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

/// Tunables for the SM-2 update rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub initial_easiness: f64,
    pub min_easiness: f64,
    /// Lowest quality that counts as a successful recall.
    pub success_threshold: i32,
    pub first_interval: f64,
    pub second_interval: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_easiness: 2.5,
            min_easiness: 1.3,
            success_threshold: 3,
            first_interval: 1.0,
            second_interval: 6.0,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            initial_easiness: env_or("SRS_INITIAL_EASINESS", defaults.initial_easiness)?,
            min_easiness: env_or("SRS_MIN_EASINESS", defaults.min_easiness)?,
            success_threshold: env_or("SRS_SUCCESS_THRESHOLD", defaults.success_threshold)?,
            first_interval: env_or("SRS_FIRST_INTERVAL", defaults.first_interval)?,
            second_interval: env_or("SRS_SECOND_INTERVAL", defaults.second_interval)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_easiness.is_finite() || self.min_easiness <= 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "min_easiness must be positive, got {}",
                self.min_easiness
            )));
        }
        if !self.initial_easiness.is_finite() || self.initial_easiness < self.min_easiness {
            return Err(ConfigError::OutOfRange(format!(
                "initial_easiness {} is below min_easiness {}",
                self.initial_easiness, self.min_easiness
            )));
        }
        if !(0..=5).contains(&self.success_threshold) {
            return Err(ConfigError::OutOfRange(format!(
                "success_threshold must be in 0..=5, got {}",
                self.success_threshold
            )));
        }
        if !(self.first_interval >= 1.0 && self.second_interval >= self.first_interval) {
            return Err(ConfigError::OutOfRange(format!(
                "intervals must satisfy 1 <= first ({}) <= second ({})",
                self.first_interval, self.second_interval
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_pool_size: u32,
    pub log_level: String,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| "zwcd.db".into()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".into()),
            db_pool_size: env_or("DB_POOL_SIZE", 8)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            scheduler: SchedulerConfig::from_env()?,
        })
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_initial_below_floor() {
        let config = SchedulerConfig {
            initial_easiness: 1.0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn rejects_threshold_outside_quality_scale() {
        let config = SchedulerConfig {
            success_threshold: 6,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_partial_config() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{ "success_threshold": 4 }"#).unwrap();
        assert_eq!(config.success_threshold, 4);
        assert_eq!(config.initial_easiness, 2.5);
    }
}
