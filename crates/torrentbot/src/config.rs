//! Settings read from the environment

use telegram::Location;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid location {0:?}, expected name:path")]
    InvalidLocation(String),
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
}

/// Process settings
///
/// | Variable           | Meaning                                  |
/// |--------------------|------------------------------------------|
/// | `TELOXIDE_TOKEN`   | Telegram bot token (required)            |
/// | `QBIT_HOST`        | qBittorrent Web UI URL (required)        |
/// | `QBIT_USERNAME`    | qBittorrent username (required)          |
/// | `QBIT_PASSWORD`    | qBittorrent password (required)          |
/// | `BOT_ALLOW_USERS`  | comma separated Telegram usernames       |
/// | `BOT_LOCATIONS`    | comma separated `name:path` pairs        |
/// | `BOT_SET_COMMANDS` | publish the command list on startup      |
/// | `BOT_VERBOSE`      | log at debug level                       |
/// | `BOT_LOG_JSON`     | log as JSON lines                        |
pub struct Settings {
    pub telegram_token: String,
    pub qbit_host: String,
    pub qbit_username: String,
    pub qbit_password: String,
    pub allowed_users: Vec<String>,
    pub locations: Vec<Location>,
    pub set_commands: bool,
    pub verbose: bool,
    pub log_json: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let flag = |key: &str| lookup(key).map(|v| parse_bool(&v)).unwrap_or(false);

        Ok(Self {
            telegram_token: required("TELOXIDE_TOKEN")?,
            qbit_host: parse_url("QBIT_HOST", required("QBIT_HOST")?)?,
            qbit_username: required("QBIT_USERNAME")?,
            qbit_password: required("QBIT_PASSWORD")?,
            allowed_users: parse_users(&lookup("BOT_ALLOW_USERS").unwrap_or_default()),
            locations: parse_locations(&lookup("BOT_LOCATIONS").unwrap_or_default())?,
            set_commands: flag("BOT_SET_COMMANDS"),
            verbose: flag("BOT_VERBOSE"),
            log_json: flag("BOT_LOG_JSON"),
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    match reqwest::Url::parse(value.trim()) {
        Ok(_) => Ok(value.trim().to_string()),
        Err(e) => Err(ConfigError::InvalidUrl {
            key,
            reason: e.to_string(),
        }),
    }
}

fn parse_users(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|u| u.trim().trim_start_matches('@'))
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `name:path,name:path`, keeping the order
fn parse_locations(value: &str) -> Result<Vec<Location>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (name, path) = item
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidLocation(item.to_string()))?;
            let (name, path) = (name.trim(), path.trim());
            if name.is_empty() || path.is_empty() || path.contains(':') {
                return Err(ConfigError::InvalidLocation(item.to_string()));
            }
            Ok(Location::new(name, path))
        })
        .collect()
}
