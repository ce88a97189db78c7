//! Bot configuration

use std::collections::HashSet;
use std::time::Duration;

use crate::callbacks::IdGenerator;
use crate::constants::{token, CALLBACK_TTL, MAX_LOCATION_NAME_LEN};
use crate::error::{BotError, BotResult};
use crate::types::{Location, Locations};

/// Settings of a [`TorrentBot`](crate::TorrentBot)
///
/// ```no_run
/// use telegram::{BotConfig, Location};
///
/// let config = BotConfig::new()
///     .with_allowed_users(["alice"])
///     .with_locations(vec![Location::new("movies", "/data/movies")])
///     .with_set_commands(true);
/// ```
#[derive(Clone)]
pub struct BotConfig {
    pub(crate) allowed_users: Vec<String>,
    pub(crate) locations: Vec<Location>,
    pub(crate) set_commands: bool,
    pub(crate) http: reqwest::Client,
    pub(crate) callback_ttl: Duration,
    pub(crate) callback_ids: Option<IdGenerator>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            allowed_users: Vec::new(),
            locations: Vec::new(),
            set_commands: false,
            http: reqwest::Client::new(),
            callback_ttl: CALLBACK_TTL,
            callback_ids: None,
        }
    }
}

impl BotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usernames allowed to talk to the bot. Nobody is allowed by default.
    pub fn with_allowed_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_users = users.into_iter().map(Into::into).collect();
        self
    }

    /// Download locations offered when adding a torrent, in button order
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    /// Publish the command list to Telegram on startup
    pub fn with_set_commands(mut self, set: bool) -> Self {
        self.set_commands = set;
        self
    }

    /// HTTP client used to fetch uploaded torrent files
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// How long interactive prompts keep accepting button presses
    pub fn with_callback_ttl(mut self, ttl: Duration) -> Self {
        self.callback_ttl = ttl;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_callback_ids(mut self, ids: IdGenerator) -> Self {
        self.callback_ids = Some(ids);
        self
    }

    /// Check the configured locations and return them ready for lookup
    ///
    /// Location names end up in callback data after the callback ID, so
    /// they must be non-empty, unique, short enough to fit and distinct
    /// from the control tokens.
    pub(crate) fn validate_locations(&self) -> BotResult<Locations> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            let name = location.name.as_str();
            if name.is_empty() {
                return Err(BotError::Config("location name must not be empty".to_string()));
            }
            if token::RESERVED.contains(&name) {
                return Err(BotError::Config(format!(
                    "location name {:?} is reserved",
                    name
                )));
            }
            if name.len() > MAX_LOCATION_NAME_LEN {
                return Err(BotError::Config(format!(
                    "location name {:?} is longer than {} bytes",
                    name, MAX_LOCATION_NAME_LEN
                )));
            }
            if !seen.insert(name) {
                return Err(BotError::Config(format!(
                    "location {:?} is configured twice",
                    name
                )));
            }
            if location.path.is_empty() {
                return Err(BotError::Config(format!(
                    "location {:?} has an empty path",
                    name
                )));
            }
        }
        Ok(Locations::new(self.locations.clone()))
    }
}
