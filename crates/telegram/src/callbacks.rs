//! Callback handlers for inline keyboard interactions
//!
//! Inline buttons can only carry a few dozen bytes, so a multi-step
//! conversation keeps its state in a one-shot handler stored here under a
//! short random ID. The ID becomes the prefix of every button's callback
//! data. A handler is run at most once: it is removed either when a
//! matching callback arrives or when its TTL runs out.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::constants::CALLBACK_ID_LEN;
use crate::error::BotResult;
use crate::reply::Reply;
use crate::types::MessageRef;

/// Button press delivered to a registered handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    /// Prompt message carrying the pressed button
    pub message: MessageRef,
    /// Callback data with the ID prefix stripped
    pub data: String,
}

pub type CallbackFuture = Pin<Box<dyn Future<Output = BotResult<Reply>> + Send>>;
pub type CallbackHandler = Box<dyn FnOnce(CallbackRequest) -> CallbackFuture + Send>;
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

struct Entry {
    handler: CallbackHandler,
    expires_at: Instant,
    timer: JoinHandle<()>,
}

type Entries = Mutex<HashMap<String, Entry>>;

/// Thread-safe store of pending callback handlers
#[derive(Clone)]
pub struct CallbackRegistry {
    entries: Arc<Entries>,
    ttl: Duration,
    new_id: IdGenerator,
}

impl CallbackRegistry {
    /// Create a registry handing out random UUIDs
    pub fn new(ttl: Duration) -> Self {
        Self::with_id_generator(ttl, Arc::new(|| uuid::Uuid::new_v4().to_string()))
    }

    /// Create a registry with a custom ID source
    ///
    /// Generated IDs must be exactly [`CALLBACK_ID_LEN`] bytes long.
    pub fn with_id_generator(ttl: Duration, new_id: IdGenerator) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            new_id,
        }
    }

    /// Store `handler` and return the ID to embed into button data
    ///
    /// Must be called from within a tokio runtime, the expiry timer is a
    /// spawned task.
    pub fn register<F, Fut>(&self, handler: F) -> String
    where
        F: FnOnce(CallbackRequest) -> Fut + Send + 'static,
        Fut: Future<Output = BotResult<Reply>> + Send + 'static,
    {
        let id = (self.new_id)();
        debug_assert_eq!(id.len(), CALLBACK_ID_LEN);

        let expires_at = Instant::now() + self.ttl;
        let timer = tokio::spawn(expire(Arc::downgrade(&self.entries), id.clone(), expires_at));
        let entry = Entry {
            handler: Box::new(move |req| Box::pin(handler(req))),
            expires_at,
            timer,
        };

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = entries.insert(id.clone(), entry) {
            old.timer.abort();
            tracing::warn!("Callback ID {} was reused, dropping the previous handler", id);
        }
        tracing::debug!("Registered callback {} ({} pending)", id, entries.len());
        id
    }

    /// Remove and return the handler registered under `id`
    pub fn consume(&self, id: &str) -> Option<CallbackHandler> {
        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.remove(id)?
        };
        entry.timer.abort();

        if entry.expires_at <= Instant::now() {
            tracing::debug!("Callback {} has expired", id);
            return None;
        }
        tracing::debug!("Consumed callback {}", id);
        Some(entry.handler)
    }

    /// Number of pending handlers
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn expire(entries: Weak<Entries>, id: String, expires_at: Instant) {
    tokio::time::sleep_until(expires_at).await;

    let Some(entries) = entries.upgrade() else {
        return;
    };
    let mut entries = entries.lock().unwrap_or_else(|e| e.into_inner());
    // The ID may have been re-registered with a later deadline meanwhile
    if entries.get(&id).is_some_and(|e| e.expires_at <= Instant::now()) {
        entries.remove(&id);
        tracing::debug!("Callback {} expired unused", id);
    }
}

/// Split callback data into callback ID and handler-specific payload
///
/// Returns `None` unless the data holds an ID followed by a non-empty payload.
pub fn split_payload(data: &str) -> Option<(&str, &str)> {
    if data.len() <= CALLBACK_ID_LEN || !data.is_char_boundary(CALLBACK_ID_LEN) {
        return None;
    }
    Some(data.split_at(CALLBACK_ID_LEN))
}
