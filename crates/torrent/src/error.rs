use thiserror::Error;

/// Errors reported by a download daemon client
#[derive(Debug, Error)]
pub enum Error {
    /// qBittorrent Web API error
    #[error("qBittorrent error: {0}")]
    Client(#[from] qbit_rs::Error),
    /// The torrent URL could not be parsed
    #[error("invalid torrent URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The daemon accepted the call but refused to carry it out
    #[error("{0}")]
    Rejected(String),
}

/// Result type alias for daemon operations
pub type Result<T> = std::result::Result<T, Error>;
