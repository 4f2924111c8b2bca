use std::env;

use chrono_tz::Tz;
use thiserror::Error;

use crate::api_connection::endpoints::{DEFAULT_MODEL, OPENROUTER_CHAT_URL};

// Name of the environment variable holding the OpenRouter key
pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_FAST_PATH_MINUTES: u32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: expected a positive integer")]
    InvalidNumber { key: &'static str, value: String },
    #[error("unknown time zone '{0}' in COOKSY_TIMEZONE: expected an IANA name such as Europe/Paris")]
    UnknownTimeZone(String),
}

/// Runtime settings, read from the process environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key_env_var: String,
    pub model: String,
    pub api_url: String,
    pub site_url: String,
    pub app_name: String,
    pub provider_only: Vec<String>,
    pub fast_path_minutes: u32,
    /// Zone reminders are anchored in and labelled with.
    pub time_zone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_url: OPENROUTER_CHAT_URL.to_string(),
            site_url: "http://localhost:3000".to_string(),
            app_name: "Cooksy".to_string(),
            provider_only: Vec::new(),
            fast_path_minutes: DEFAULT_FAST_PATH_MINUTES,
            time_zone: Tz::UTC,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_sources(|key| env::var(key).ok(), iana_time_zone::get_timezone().ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(lookup, None)
    }

    /// Like `from_lookup`, with the host's own zone name as the fallback after
    /// `COOKSY_TIMEZONE` and `TZ`. Unparseable `TZ` or host values are skipped.
    pub fn from_sources<F>(lookup: F, system_zone: Option<String>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let fast_path_minutes = match non_empty("COOKSY_FAST_PATH_MINUTES") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        key: "COOKSY_FAST_PATH_MINUTES",
                        value: raw,
                    })
                }
            },
            None => defaults.fast_path_minutes,
        };

        let provider_only = non_empty("COOKSY_PROVIDER_ONLY")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let time_zone = match non_empty("COOKSY_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimeZone(raw.clone()))?,
            None => non_empty("TZ")
                .and_then(|raw| parse_zone(&raw))
                .or_else(|| system_zone.as_deref().and_then(parse_zone))
                .unwrap_or(defaults.time_zone),
        };

        Ok(Self {
            api_key_env_var: defaults.api_key_env_var,
            model: non_empty("COOKSY_MODEL").unwrap_or(defaults.model),
            api_url: non_empty("COOKSY_API_URL").unwrap_or(defaults.api_url),
            site_url: non_empty("SITE_URL").unwrap_or(defaults.site_url),
            app_name: non_empty("APP_NAME").unwrap_or(defaults.app_name),
            provider_only,
            fast_path_minutes,
            time_zone,
        })
    }
}

// `TZ` may carry a leading ':' (`:Europe/Paris`)
fn parse_zone(raw: &str) -> Option<Tz> {
    raw.trim().trim_start_matches(':').parse().ok()
}
