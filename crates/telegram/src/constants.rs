//! Constants used throughout the telegram bot

use std::time::Duration;

/// Length of a callback ID (a hyphenated UUID) at the start of callback data
pub const CALLBACK_ID_LEN: usize = 36;

/// Telegram limit on inline button callback data, in bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Longest location name that still fits into callback data
pub const MAX_LOCATION_NAME_LEN: usize = MAX_CALLBACK_DATA_LEN - CALLBACK_ID_LEN;

/// How long the buttons of an interactive prompt keep working
pub const CALLBACK_TTL: Duration = Duration::from_secs(60 * 60);

/// Long-poll timeout for fetching updates
pub const POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed poll before trying again
pub const POLL_BACKOFF: Duration = Duration::from_millis(100);

/// Callback tokens with a fixed meaning
pub mod token {
    pub const OTHER: &str = "other";
    pub const CANCEL: &str = "cancel";
    pub const YES: &str = "yes";
    pub const NO: &str = "no";

    /// Tokens a location name must not collide with
    pub const RESERVED: [&str; 4] = [OTHER, CANCEL, YES, NO];
}

/// Fixed reply texts
pub mod text {
    pub const GREETING: &str = "Drop me a magnet link/torrent URL or a torrent file.";
    pub const NOT_RECOGNIZED: &str = "Sorry, I don't know you...";
    pub const UNKNOWN_COMMAND: &str = "Unknown command";
    pub const EXPIRED_BUTTONS: &str = "Looks like these buttons no longer work ¯\\_(ツ)_/¯";
    pub const DONE: &str = "Done 😎";
    pub const PORT_OPEN: &str = "Hooray! The port is open :)";
    pub const PORT_CLOSED: &str = "Hmm... The port is closed :(";
    pub const ASK_LOCATION: &str = "Ok, gonna queue it for download. But first tell me what is it?";
    pub const ADD_CANCELLED: &str = "Ok, not gonna download it";
    pub const REMOVE_CANCELLED: &str = "Ok, not gonna remove any torrents";
    pub const NOTHING_TO_REMOVE: &str = "Don't have any matching torrents";
}
