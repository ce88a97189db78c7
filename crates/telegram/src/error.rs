use thiserror::Error;

/// Custom error type for telegram bot operations
#[derive(Debug, Error)]
pub enum BotError {
    /// Telegram API error
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    /// Download daemon error
    #[error("{0}")]
    Daemon(#[from] torrent::Error),
    /// Fetching an uploaded file failed
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),
    /// Any other failure talking to the messaging platform
    #[error("{0}")]
    Transport(String),
    /// A torrent ID argument is not a number
    #[error("{0:?} is not a valid torrent ID")]
    InvalidTorrentId(String),
    /// A callback referenced a location that is not configured
    #[error("I don't know this location")]
    UnknownLocation(String),
    /// The bot configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BotError {
    /// Whether the error was caused by what the user sent, as opposed to a
    /// failing remote call
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            BotError::InvalidTorrentId(_) | BotError::UnknownLocation(_)
        )
    }
}

/// Result type alias for bot operations
pub type BotResult<T> = Result<T, BotError>;

/// Helper trait to convert results into user-friendly messages
pub trait UserMessage {
    fn user_message(&self) -> String;
}

impl UserMessage for BotError {
    fn user_message(&self) -> String {
        if self.is_input_error() {
            format!("{} 🤷", self)
        } else {
            format!("Oops, something went wrong: {}", self)
        }
    }
}
