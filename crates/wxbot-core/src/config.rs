use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

pub const DEFAULT_WEATHER_API_BASE: &str = "https://api.openweathermap.org";

/// Typed configuration, sourced from the environment (plus a local `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub weather_api_key: String,
    /// Provider base URL. Overridable mainly so tests can point at a mock
    /// server.
    pub weather_api_base: String,
    pub subscribers_file: PathBuf,
    /// Enhanced replies: /forecast, /help, rounded temperatures,
    /// humidity/sunrise/sunset lines and the subscribe suggestion after a
    /// city lookup.
    pub enhanced: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required secrets: fail fast at startup.
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let weather_api_key = env_str("WEATHER_API_KEY").unwrap_or_default();
        if weather_api_key.trim().is_empty() {
            return Err(Error::Config(
                "WEATHER_API_KEY environment variable is required".to_string(),
            ));
        }

        let weather_api_base = env_str("WEATHER_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_WEATHER_API_BASE.to_string());

        let subscribers_file =
            env_path("SUBSCRIBERS_FILE").unwrap_or_else(|| PathBuf::from("subscribers.json"));

        let enhanced = env_bool("WEATHER_ENHANCED").unwrap_or(true);

        Ok(Self {
            telegram_bot_token,
            weather_api_key,
            weather_api_base,
            subscribers_file,
            enhanced,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
