//! In-memory fakes of the bot's collaborators

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use torrent::{
    AddTorrent, Daemon, NewTorrent, SessionFlag, SessionStats, Torrent, TorrentField, TorrentRef,
};

use crate::commands::CommandEntry;
use crate::error::{BotError, BotResult};
use crate::reply::Reply;
use crate::telegram::Messenger;
use crate::types::{CallbackQuery, Document, Message, MessageRef, Update, UpdateKind, User};

/// Messenger replaying queued update batches
///
/// Once the queue runs dry the fake cancels `cancel`, so a running bot
/// stops after processing everything that was queued.
pub(crate) struct FakeMessenger {
    cancel: CancellationToken,
    batches: Mutex<VecDeque<BotResult<Vec<Update>>>>,
    pub offsets: Mutex<Vec<i32>>,
    pub sent: Mutex<Vec<Reply>>,
    pub answered: Mutex<Vec<String>>,
    pub published: Mutex<Vec<Vec<&'static str>>>,
    pub file_urls: Mutex<HashMap<String, String>>,
    pub fail_send: Mutex<bool>,
    pub fail_answer: Mutex<bool>,
    pub fail_publish: Mutex<bool>,
}

impl FakeMessenger {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            batches: Mutex::new(VecDeque::new()),
            offsets: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            answered: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            file_urls: Mutex::new(HashMap::new()),
            fail_send: Mutex::new(false),
            fail_answer: Mutex::new(false),
            fail_publish: Mutex::new(false),
        }
    }

    pub fn push(&self, batch: Vec<Update>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_error(&self, message: &str) {
        self.batches
            .lock()
            .unwrap()
            .push_back(Err(BotError::Transport(message.to_string())));
    }

    pub fn sent(&self) -> Vec<Reply> {
        self.sent.lock().unwrap().clone()
    }
}

fn failure(flag: &Mutex<bool>, what: &str) -> BotResult<()> {
    if *flag.lock().unwrap() {
        return Err(BotError::Transport(format!("{} failed", what)));
    }
    Ok(())
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn fetch_updates(&self, offset: i32, _timeout: Duration) -> BotResult<Vec<Update>> {
        self.offsets.lock().unwrap().push(offset);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => batch,
            None => {
                self.cancel.cancel();
                Ok(Vec::new())
            }
        }
    }

    async fn send(&self, reply: &Reply) -> BotResult<()> {
        failure(&self.fail_send, "send")?;
        self.sent.lock().unwrap().push(reply.clone());
        Ok(())
    }

    async fn file_url(&self, file_id: &str) -> BotResult<String> {
        self.file_urls
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| BotError::Transport(format!("file {} not found", file_id)))
    }

    async fn answer_callback(&self, callback_id: &str) -> BotResult<()> {
        failure(&self.fail_answer, "answer")?;
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }

    async fn publish_commands(&self, commands: &[CommandEntry]) -> BotResult<()> {
        failure(&self.fail_publish, "publish")?;
        self.published
            .lock()
            .unwrap()
            .push(commands.iter().map(|c| c.name).collect());
        Ok(())
    }
}

/// Daemon call as recorded by [`FakeDaemon`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Add(AddTorrent),
    PortOpen,
    Stats,
    Flag(SessionFlag),
    SetFlag(SessionFlag, bool),
    Start(TorrentRef),
    Stop(TorrentRef),
    Torrents(TorrentRef, Vec<TorrentField>),
    Remove(TorrentRef, bool),
}

/// Daemon recording every call and answering from canned data
pub(crate) struct FakeDaemon {
    pub calls: Mutex<Vec<Call>>,
    pub torrents: Mutex<Vec<Torrent>>,
    pub stats: Mutex<SessionStats>,
    pub turtle: Mutex<bool>,
    pub port_open: Mutex<bool>,
    /// Every call fails with this message when set
    pub failure: Mutex<Option<String>>,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            torrents: Mutex::new(Vec::new()),
            stats: Mutex::new(SessionStats::default()),
            turtle: Mutex::new(false),
            port_open: Mutex::new(true),
            failure: Mutex::new(None),
        }
    }

    pub fn with_torrents(torrents: Vec<Torrent>) -> Self {
        let daemon = Self::new();
        *daemon.torrents.lock().unwrap() = torrents;
        daemon
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> torrent::Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(torrent::Error::Rejected(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Daemon for FakeDaemon {
    async fn add_torrent(&self, req: AddTorrent) -> torrent::Result<NewTorrent> {
        self.record(Call::Add(req))?;
        Ok(NewTorrent {
            id: 42,
            hash: "c12fe1c06bba254a9dc9f519b335aa7c1367a88a".to_string(),
            name: "debian-12.iso".to_string(),
        })
    }

    async fn is_port_open(&self) -> torrent::Result<bool> {
        self.record(Call::PortOpen)?;
        Ok(*self.port_open.lock().unwrap())
    }

    async fn session_stats(&self) -> torrent::Result<SessionStats> {
        self.record(Call::Stats)?;
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn session_flag(&self, flag: SessionFlag) -> torrent::Result<bool> {
        self.record(Call::Flag(flag))?;
        Ok(*self.turtle.lock().unwrap())
    }

    async fn set_session_flag(&self, flag: SessionFlag, value: bool) -> torrent::Result<()> {
        self.record(Call::SetFlag(flag, value))?;
        *self.turtle.lock().unwrap() = value;
        Ok(())
    }

    async fn start_torrents(&self, ids: &TorrentRef) -> torrent::Result<()> {
        self.record(Call::Start(ids.clone()))
    }

    async fn stop_torrents(&self, ids: &TorrentRef) -> torrent::Result<()> {
        self.record(Call::Stop(ids.clone()))
    }

    async fn torrents(
        &self,
        ids: &TorrentRef,
        fields: &[TorrentField],
    ) -> torrent::Result<Vec<Torrent>> {
        self.record(Call::Torrents(ids.clone(), fields.to_vec()))?;
        Ok(self
            .torrents
            .lock()
            .unwrap()
            .iter()
            .filter(|t| ids.matches(t.id, &t.hash))
            .cloned()
            .collect())
    }

    async fn remove_torrents(&self, ids: &TorrentRef, delete_data: bool) -> torrent::Result<()> {
        self.record(Call::Remove(ids.clone(), delete_data))
    }
}

pub(crate) const CHAT: i64 = 100;

pub(crate) fn user(name: &str) -> User {
    User {
        id: 1,
        username: Some(name.to_string()),
    }
}

/// Text message update from `from`
pub(crate) fn text_update(id: i32, from: &str, text: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::Message(Message {
            id: id * 10,
            chat_id: CHAT,
            from: Some(user(from)),
            text: Some(text.to_string()),
            document: None,
        }),
    }
}

/// Document message update from `from`
pub(crate) fn document_update(id: i32, from: &str, file_id: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::Message(Message {
            id: id * 10,
            chat_id: CHAT,
            from: Some(user(from)),
            text: None,
            document: Some(Document {
                file_id: file_id.to_string(),
                file_name: Some("file.torrent".to_string()),
            }),
        }),
    }
}

/// Button press on the prompt `prompt` with raw callback `data`
pub(crate) fn callback_update(id: i32, from: &str, prompt: i32, data: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::CallbackQuery(CallbackQuery {
            id: format!("cb-{}", id),
            from: user(from),
            message: Some(MessageRef {
                chat_id: CHAT,
                message_id: prompt,
            }),
            data: Some(data.to_string()),
        }),
    }
}
