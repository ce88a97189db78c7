//! Sender authorization

use std::collections::HashSet;

/// Allow-list of Telegram usernames permitted to control the bot
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    allowed: HashSet<String>,
}

impl Authorizer {
    /// Build the allow-list. Blank names are dropped and a leading `@` is
    /// stripped, matching is otherwise exact.
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = users
            .into_iter()
            .map(|u| u.as_ref().trim().trim_start_matches('@').to_string())
            .filter(|u| !u.is_empty())
            .collect();
        Self { allowed }
    }

    pub fn is_allowed(&self, username: &str) -> bool {
        self.allowed.contains(username)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
