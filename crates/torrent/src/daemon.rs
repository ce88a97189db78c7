//! Capability set of a torrent download daemon
//!
//! The bot only ever talks to the daemon through [`Daemon`], which keeps the
//! chat side testable against fakes and independent of the concrete client.

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;

/// Identifies a single torrent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TorrentId {
    /// Numeric ID assigned by the daemon. Not stable across daemon restarts.
    Id(i64),
    /// Info-hash of the torrent
    Hash(String),
}

/// Set of torrents a daemon call applies to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TorrentRef {
    /// Every torrent known to the daemon
    #[default]
    All,
    /// Explicit list of torrents
    Ids(Vec<TorrentId>),
}

impl TorrentRef {
    /// Build a reference from numeric IDs
    pub fn ids<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        TorrentRef::Ids(ids.into_iter().map(TorrentId::Id).collect())
    }

    /// Build a reference from info-hashes
    pub fn hashes<I, S>(hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TorrentRef::Ids(hashes.into_iter().map(|h| TorrentId::Hash(h.into())).collect())
    }

    /// Check whether the torrent with the given ID and hash is referenced
    pub fn matches(&self, id: i64, hash: &str) -> bool {
        match self {
            TorrentRef::All => true,
            TorrentRef::Ids(ids) => ids.iter().any(|i| match i {
                TorrentId::Id(n) => *n == id,
                TorrentId::Hash(h) => h.eq_ignore_ascii_case(hash),
            }),
        }
    }
}

/// Where torrent metadata comes from
#[derive(Clone, PartialEq, Eq)]
pub enum TorrentSource {
    /// Magnet link or URL of a .torrent file
    Url(String),
    /// Raw contents of a .torrent file
    Metainfo(Vec<u8>),
}

impl fmt::Debug for TorrentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TorrentSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            TorrentSource::Metainfo(data) => write!(f, "Metainfo({} bytes)", data.len()),
        }
    }
}

/// Request to add a new torrent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTorrent {
    pub source: TorrentSource,
    /// Directory to download into. The daemon default is used when `None`.
    pub download_dir: Option<String>,
}

impl AddTorrent {
    pub fn new(source: TorrentSource) -> Self {
        Self {
            source,
            download_dir: None,
        }
    }
}

/// Torrent created by [`Daemon::add_torrent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTorrent {
    pub id: i64,
    pub hash: String,
    pub name: String,
}

/// Aggregated session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Current download rate, bytes per second
    pub download_rate: u64,
    /// Current upload rate, bytes per second
    pub upload_rate: u64,
    pub active_torrents: u64,
    pub paused_torrents: u64,
    /// Total bytes downloaded
    pub downloaded: u64,
    /// Total bytes uploaded
    pub uploaded: u64,
}

/// Boolean session settings the bot can read and toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlag {
    /// Alternative ("turtle") speed limits
    Turtle,
}

/// Torrent attributes that can be requested from [`Daemon::torrents`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorrentField {
    Id,
    Hash,
    Name,
    Status,
    ValidSize,
    WantedSize,
    DownloadRate,
    UploadRate,
    UploadRatio,
    Eta,
}

/// Torrent activity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TorrentStatus {
    Stopped,
    Checking,
    Queued,
    Downloading,
    Seeding,
    Error,
    #[default]
    Unknown,
}

impl fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TorrentStatus::Stopped => "stopped",
            TorrentStatus::Checking => "checking",
            TorrentStatus::Queued => "queued",
            TorrentStatus::Downloading => "downloading",
            TorrentStatus::Seeding => "seeding",
            TorrentStatus::Error => "error",
            TorrentStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A torrent as reported by the daemon
///
/// Only the fields passed to [`Daemon::torrents`] are guaranteed to be
/// populated, the rest may hold default values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Torrent {
    pub id: i64,
    pub hash: String,
    pub name: String,
    pub status: TorrentStatus,
    /// Bytes downloaded and verified
    pub valid_size: u64,
    /// Bytes selected for download
    pub wanted_size: u64,
    pub download_rate: u64,
    pub upload_rate: u64,
    pub upload_ratio: f64,
    /// Estimated seconds until completion, negative or zero when unknown
    pub eta: i64,
}

/// Operations the bot performs on a download daemon
#[async_trait]
pub trait Daemon: Send + Sync {
    /// Add a torrent and report its ID, hash and name
    async fn add_torrent(&self, req: AddTorrent) -> Result<NewTorrent>;

    /// Check whether the incoming peer port is reachable
    async fn is_port_open(&self) -> Result<bool>;

    async fn session_stats(&self) -> Result<SessionStats>;

    async fn session_flag(&self, flag: SessionFlag) -> Result<bool>;

    async fn set_session_flag(&self, flag: SessionFlag, value: bool) -> Result<()>;

    async fn start_torrents(&self, ids: &TorrentRef) -> Result<()>;

    async fn stop_torrents(&self, ids: &TorrentRef) -> Result<()>;

    /// Fetch the referenced torrents with (at least) the requested fields
    async fn torrents(&self, ids: &TorrentRef, fields: &[TorrentField]) -> Result<Vec<Torrent>>;

    /// Remove torrents, optionally deleting downloaded data
    async fn remove_torrents(&self, ids: &TorrentRef, delete_data: bool) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torrent_ref_matches() {
        assert!(TorrentRef::All.matches(7, "abc"));

        let ids = TorrentRef::ids([2, 7]);
        assert!(ids.matches(7, "abc"));
        assert!(!ids.matches(3, "abc"));

        let hashes = TorrentRef::hashes(["ABC"]);
        assert!(hashes.matches(1, "abc"));
        assert!(!hashes.matches(1, "def"));
    }

    #[test]
    fn test_torrent_status_display() {
        assert_eq!(TorrentStatus::Downloading.to_string(), "downloading");
        assert_eq!(TorrentStatus::default().to_string(), "unknown");
    }

    #[test]
    fn test_metainfo_debug_hides_bytes() {
        let src = TorrentSource::Metainfo(vec![0; 12]);
        assert_eq!(format!("{:?}", src), "Metainfo(12 bytes)");
    }
}
