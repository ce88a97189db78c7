//! Download daemon client
//!
//! This crate defines the capability set the bot needs from a torrent
//! daemon (the [`Daemon`] trait) together with its domain types, and
//! provides a qBittorrent backed implementation using the qbit-rs library.

pub mod daemon;
pub mod error;
pub mod torrent;
pub mod utils;

pub use daemon::{
    AddTorrent, Daemon, NewTorrent, SessionFlag, SessionStats, Torrent, TorrentField, TorrentId,
    TorrentRef, TorrentSource, TorrentStatus,
};
pub use error::{Error, Result};
pub use torrent::TorrentApi;
pub use utils::{extract_info_hash, extract_torrent_info_hash, magnet_display_name};
