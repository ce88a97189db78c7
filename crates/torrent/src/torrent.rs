use async_trait::async_trait;
use qbit_rs::{
    model::{
        AddTorrentArg, ConnectionStatus, Credential, GetTorrentListArg, Hashes, TorrentFile,
        TorrentSource as QbitSource,
    },
    Qbit,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::daemon::{
    AddTorrent, Daemon, NewTorrent, SessionFlag, SessionStats, Torrent, TorrentField, TorrentId,
    TorrentRef, TorrentSource, TorrentStatus,
};
use crate::error::{Error, Result};
use crate::utils;

/// How many times a freshly added torrent is looked up before giving up
const ADD_LOOKUP_ATTEMPTS: u32 = 3;
const ADD_LOOKUP_DELAY: Duration = Duration::from_millis(500);

/// Process-local numeric IDs for qBittorrent torrents
///
/// qBittorrent only identifies torrents by info-hash, so IDs are handed out
/// sequentially the first time a hash is seen.
#[derive(Debug, Default)]
struct IdMap {
    by_hash: HashMap<String, i64>,
    by_id: HashMap<i64, String>,
    last: i64,
}

impl IdMap {
    fn id_for(&mut self, hash: &str) -> i64 {
        let hash = hash.to_lowercase();
        if let Some(&id) = self.by_hash.get(&hash) {
            return id;
        }
        self.last += 1;
        self.by_hash.insert(hash.clone(), self.last);
        self.by_id.insert(self.last, hash);
        self.last
    }

    fn hash_for(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }
}

/// qBittorrent Web API client implementing [`Daemon`]
#[derive(Clone)]
pub struct TorrentApi {
    pub client: Arc<Qbit>,
    ids: Arc<RwLock<IdMap>>,
}

impl TorrentApi {
    /// Create a new TorrentApi instance for the given Web UI endpoint
    ///
    /// # Panics
    /// Panics if `endpoint` is not a valid URL
    pub fn new(endpoint: &str, username: &str, password: &str) -> Self {
        let credential = Credential::new(username, password);
        let client = Arc::new(Qbit::new(endpoint, credential));
        TorrentApi {
            client,
            ids: Arc::new(RwLock::new(IdMap::default())),
        }
    }

    /// Authenticate with the qBittorrent server
    ///
    /// # Errors
    /// Returns an error if authentication fails
    pub async fn login(&self) -> Result<()> {
        self.client.login(false).await.map_err(|e| {
            tracing::error!("Failed to login to qBittorrent: {}", e);
            Error::from(e)
        })
    }

    /// Query the qBittorrent version, mostly useful as a connectivity probe
    pub async fn version(&self) -> Result<String> {
        Ok(self.client.get_version().await?)
    }

    fn id_for(&self, hash: &str) -> i64 {
        let mut ids = self.ids.write().unwrap_or_else(|e| e.into_inner());
        ids.id_for(hash)
    }

    /// Fetch torrents ordered by addition time, assigning IDs on the way
    async fn query(&self, hashes: Option<String>, newest_only: bool) -> Result<Vec<Torrent>> {
        tracing::debug!("Querying torrents from qBittorrent");
        let arg = GetTorrentListArg {
            filter: None,
            category: None,
            tag: None,
            sort: Some("added_on".to_string()),
            reverse: Some(newest_only),
            limit: newest_only.then_some(1),
            offset: None,
            hashes,
        };

        let list = self.client.get_torrent_list(arg).await.map_err(|err| {
            tracing::error!("Error querying torrents: {}", err);
            err
        })?;

        Ok(list
            .into_iter()
            .filter_map(|t| {
                let hash = t.hash?;
                Some(Torrent {
                    id: self.id_for(&hash),
                    name: t.name.unwrap_or_else(|| hash.clone()),
                    status: t
                        .state
                        .map(|s| status_from_state(&format!("{:?}", s)))
                        .unwrap_or_default(),
                    valid_size: t.completed.unwrap_or(0).max(0) as u64,
                    wanted_size: t.size.unwrap_or(0).max(0) as u64,
                    download_rate: t.dlspeed.unwrap_or(0).max(0) as u64,
                    upload_rate: t.upspeed.unwrap_or(0).max(0) as u64,
                    upload_ratio: t.ratio.unwrap_or(0.0) as f64,
                    eta: t.eta.unwrap_or(0) as i64,
                    hash,
                })
            })
            .collect())
    }

    /// Translate a reference into qBittorrent hashes
    ///
    /// Returns `None` when the reference names torrents none of which exist.
    async fn resolve(&self, ids: &TorrentRef) -> Result<Option<Hashes>> {
        let wanted = match ids {
            TorrentRef::All => return Ok(Some(Hashes::All)),
            TorrentRef::Ids(wanted) => wanted,
        };

        let unknown = {
            let map = self.ids.read().unwrap_or_else(|e| e.into_inner());
            wanted
                .iter()
                .any(|i| matches!(i, TorrentId::Id(n) if map.hash_for(*n).is_none()))
        };
        if unknown {
            // Assigns IDs to torrents added since the last listing
            self.query(None, false).await?;
        }

        let map = self.ids.read().unwrap_or_else(|e| e.into_inner());
        let hashes: Vec<String> = wanted
            .iter()
            .filter_map(|i| match i {
                TorrentId::Id(n) => map.hash_for(*n).map(str::to_string),
                TorrentId::Hash(h) => Some(h.to_lowercase()),
            })
            .collect();

        if hashes.is_empty() {
            tracing::debug!("None of the requested torrents exist: {:?}", wanted);
            return Ok(None);
        }
        Ok(Some(Hashes::from(hashes)))
    }

    /// Find the torrent that was just added
    async fn lookup_added(&self, hash: Option<&str>) -> Result<Option<Torrent>> {
        for attempt in 0..ADD_LOOKUP_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(ADD_LOOKUP_DELAY).await;
            }
            let found = match hash {
                Some(hash) => self.query(Some(hash.to_string()), false).await?,
                None => self.query(None, true).await?,
            };
            if let Some(torrent) = found.into_iter().next() {
                return Ok(Some(torrent));
            }
        }
        Ok(None)
    }
}

/// Map a qBittorrent state name onto a [`TorrentStatus`]
fn status_from_state(state: &str) -> TorrentStatus {
    let state = state.to_ascii_lowercase();
    if state.starts_with("paused") || state.starts_with("stopped") {
        TorrentStatus::Stopped
    } else if state.starts_with("checking") || state == "allocating" || state == "moving" {
        TorrentStatus::Checking
    } else if state.starts_with("queued") {
        TorrentStatus::Queued
    } else if state.ends_with("dl") || state == "downloading" {
        TorrentStatus::Downloading
    } else if state.ends_with("up") || state == "uploading" {
        TorrentStatus::Seeding
    } else if state == "error" || state == "missingfiles" {
        TorrentStatus::Error
    } else {
        TorrentStatus::Unknown
    }
}

#[async_trait]
impl Daemon for TorrentApi {
    async fn add_torrent(&self, req: AddTorrent) -> Result<NewTorrent> {
        let (source, hash, fallback_name) = match req.source {
            TorrentSource::Url(url) => {
                tracing::info!("Adding torrent from URL: {}", url);
                let hash = utils::extract_info_hash(&url);
                let name = utils::magnet_display_name(&url);
                let parsed = url.parse::<reqwest::Url>().map_err(|e| Error::InvalidUrl {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
                let source = QbitSource::Urls {
                    urls: vec![parsed].into(),
                };
                (source, hash, name)
            }
            TorrentSource::Metainfo(data) => {
                tracing::info!("Adding torrent from metainfo ({} bytes)", data.len());
                let hash = utils::extract_torrent_info_hash(&data);
                let source = QbitSource::TorrentFiles {
                    torrents: vec![TorrentFile {
                        filename: "upload.torrent".to_string(),
                        data,
                    }],
                };
                (source, hash, None)
            }
        };

        let arg = AddTorrentArg {
            source,
            savepath: req.download_dir,
            ..Default::default()
        };
        self.client.add_torrent(arg).await.map_err(|err| {
            tracing::error!("Error adding torrent: {}", err);
            err
        })?;

        match self.lookup_added(hash.as_deref()).await? {
            Some(t) => Ok(NewTorrent {
                id: t.id,
                name: t.name,
                hash: t.hash,
            }),
            None => {
                let hash = hash.ok_or_else(|| {
                    Error::Rejected("torrent was accepted but never showed up".to_string())
                })?;
                tracing::warn!("Added torrent {} is not listed yet", hash);
                Ok(NewTorrent {
                    id: self.id_for(&hash),
                    name: fallback_name.unwrap_or_else(|| hash.clone()),
                    hash,
                })
            }
        }
    }

    async fn is_port_open(&self) -> Result<bool> {
        let info = self.client.get_transfer_info().await?;
        Ok(matches!(info.connection_status, ConnectionStatus::Connected))
    }

    async fn session_stats(&self) -> Result<SessionStats> {
        let info = self.client.get_transfer_info().await?;
        let torrents = self.query(None, false).await?;
        let paused = torrents
            .iter()
            .filter(|t| t.status == TorrentStatus::Stopped)
            .count() as u64;

        Ok(SessionStats {
            download_rate: info.dl_info_speed as u64,
            upload_rate: info.up_info_speed as u64,
            active_torrents: torrents.len() as u64 - paused,
            paused_torrents: paused,
            downloaded: info.dl_info_data as u64,
            uploaded: info.up_info_data as u64,
        })
    }

    async fn session_flag(&self, flag: SessionFlag) -> Result<bool> {
        match flag {
            SessionFlag::Turtle => Ok(self.client.get_speed_limits_mode().await?),
        }
    }

    async fn set_session_flag(&self, flag: SessionFlag, value: bool) -> Result<()> {
        match flag {
            SessionFlag::Turtle => {
                // qBittorrent only exposes a toggle
                if self.client.get_speed_limits_mode().await? != value {
                    self.client.toggle_speed_limits_mode().await?;
                }
                Ok(())
            }
        }
    }

    async fn start_torrents(&self, ids: &TorrentRef) -> Result<()> {
        if let Some(hashes) = self.resolve(ids).await? {
            self.client.start_torrents(hashes).await?;
        }
        Ok(())
    }

    async fn stop_torrents(&self, ids: &TorrentRef) -> Result<()> {
        if let Some(hashes) = self.resolve(ids).await? {
            self.client.stop_torrents(hashes).await?;
        }
        Ok(())
    }

    async fn torrents(&self, ids: &TorrentRef, _fields: &[TorrentField]) -> Result<Vec<Torrent>> {
        // qBittorrent always returns complete torrent objects
        let torrents = self.query(None, false).await?;
        Ok(torrents
            .into_iter()
            .filter(|t| ids.matches(t.id, &t.hash))
            .collect())
    }

    async fn remove_torrents(&self, ids: &TorrentRef, delete_data: bool) -> Result<()> {
        if let Some(hashes) = self.resolve(ids).await? {
            tracing::info!("Removing torrents (delete data: {})", delete_data);
            self.client.delete_torrents(hashes, delete_data).await?;
        }
        Ok(())
    }
}
