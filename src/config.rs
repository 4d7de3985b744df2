use crate::categories::{CategoryError, CategoryRegistry};
use crate::engine::{FixedWeekdayCalendar, OverrideTable};
use chrono::Weekday;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub week_end: Weekday,
    pub prior_balance_exempt_codes: Vec<String>,
    pub categories_file: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let week_end_raw = env_map
            .get("WEEK_END_DAY")
            .map(|s| s.as_str())
            .unwrap_or("sun");
        let week_end = parse_weekday(week_end_raw).ok_or_else(|| {
            ConfigError::InvalidValue(
                "WEEK_END_DAY".to_string(),
                format!("must be a weekday such as sun or friday, got {}", week_end_raw),
            )
        })?;

        let prior_balance_exempt_codes = env_map
            .get("PRIOR_BALANCE_EXEMPT_CODES")
            .map(|codes| {
                codes
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let categories_file = env_map
            .get("CATEGORIES_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Config {
            database_path,
            week_end,
            prior_balance_exempt_codes,
            categories_file,
        })
    }

    pub fn override_table(&self) -> OverrideTable {
        OverrideTable::with_exempt_codes(self.prior_balance_exempt_codes.iter().cloned())
    }

    pub fn week_calendar(&self) -> FixedWeekdayCalendar {
        FixedWeekdayCalendar::new(self.week_end)
    }

    pub fn category_registry(&self) -> Result<CategoryRegistry, CategoryError> {
        CategoryRegistry::load(self.categories_file.as_deref().map(Path::new))
    }
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
