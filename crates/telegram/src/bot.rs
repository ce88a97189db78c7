//! Update dispatching
//!
//! [`TorrentBot`] long-polls the messenger, checks every update against the
//! allow-list and routes it to a command, the add-torrent handlers or a
//! pending callback. Updates are handled one at a time and each reply is
//! sent before the next update is looked at.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use torrent::Daemon;

use crate::auth::Authorizer;
use crate::callbacks::{split_payload, CallbackRegistry, CallbackRequest};
use crate::commands::{self, CommandTable, Context};
use crate::config::BotConfig;
use crate::constants::{text, POLL_BACKOFF, POLL_TIMEOUT};
use crate::error::{BotError, BotResult};
use crate::reply::Reply;
use crate::telegram::Messenger;
use crate::types::{CallbackQuery, Message, Update, UpdateKind};
use crate::utils::split_command;

/// Chat front-end of a torrent daemon
pub struct TorrentBot {
    ctx: Context,
    auth: Authorizer,
    commands: CommandTable,
    set_commands: bool,
}

impl TorrentBot {
    /// Create a bot talking to `messenger` and controlling `daemon`
    ///
    /// # Errors
    /// [`BotError::Config`] when a configured location is unusable
    pub fn new(
        messenger: Arc<dyn Messenger>,
        daemon: Arc<dyn Daemon>,
        config: BotConfig,
    ) -> BotResult<Self> {
        let locations = config.validate_locations()?;
        let callbacks = match config.callback_ids {
            Some(ids) => CallbackRegistry::with_id_generator(config.callback_ttl, ids),
            None => CallbackRegistry::new(config.callback_ttl),
        };

        let auth = Authorizer::new(&config.allowed_users);
        if auth.is_empty() {
            tracing::warn!("No allowed users configured, every update will be rejected");
        }
        tracing::info!(
            "Bot configured with {} allowed users and {} locations",
            auth.len(),
            locations.len()
        );

        Ok(Self {
            ctx: Context {
                messenger,
                daemon,
                http: config.http,
                locations: Arc::new(locations),
                callbacks,
            },
            auth,
            commands: CommandTable::new(),
            set_commands: config.set_commands,
        })
    }

    /// Process updates until `cancel` fires
    ///
    /// Cancellation is checked between polls. A poll that is already
    /// waiting for updates is not interrupted.
    pub async fn run(&self, cancel: CancellationToken) {
        if self.set_commands {
            self.publish_commands().await;
        }

        tracing::info!("Waiting for updates");
        let mut offset = 0;
        while !cancel.is_cancelled() {
            let updates = match self.ctx.messenger.fetch_updates(offset, POLL_TIMEOUT).await {
                Ok(updates) => updates,
                Err(err) => {
                    tracing::warn!("Can't receive updates: {}", err);
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(POLL_BACKOFF) => continue,
                    }
                }
            };

            for update in updates {
                offset = offset.max(update.id + 1);
                let id = update.id;
                if let Some(reply) = self.process_update(update).await {
                    if let Err(err) = self.ctx.messenger.send(&reply).await {
                        tracing::error!("Failed to send reply to update {}: {}", id, err);
                    }
                }
            }
        }
        tracing::info!("Stopped receiving updates");
    }

    async fn publish_commands(&self) {
        let commands = self.commands.advertised();
        tracing::debug!("Publishing {} commands", commands.len());
        if let Err(err) = self.ctx.messenger.publish_commands(&commands).await {
            tracing::warn!("Failed to publish the command list: {}", err);
        }
    }

    /// Handle a single update and build the reply to send, if any
    async fn process_update(&self, update: Update) -> Option<Reply> {
        let sender = update.sender()?;
        let username = sender.username.as_deref().unwrap_or_default();
        tracing::debug!("Update {} from {:?}", update.id, username);

        if !self.auth.is_allowed(username) {
            tracing::warn!("Rejected update {} from user {} ({:?})", update.id, sender.id, username);
            return match &update.kind {
                UpdateKind::Message(msg) => Some(Reply::to(msg).text(text::NOT_RECOGNIZED)),
                _ => update
                    .chat_id()
                    .map(|chat| Reply::to_chat(chat).text(text::NOT_RECOGNIZED)),
            };
        }

        match update.kind {
            UpdateKind::Message(msg) => self.handle_message(&msg).await,
            UpdateKind::CallbackQuery(query) => self.handle_callback(query).await,
            UpdateKind::Other => None,
        }
    }

    async fn handle_message(&self, msg: &Message) -> Option<Reply> {
        let content = msg.text.as_deref().unwrap_or_default();

        let result = if let Some((name, args)) = split_command(content) {
            let Some(entry) = self.commands.get(name) else {
                return Some(Reply::to(msg).text(text::UNKNOWN_COMMAND));
            };
            tracing::info!("Command /{} in chat {}", name, msg.chat_id);
            entry
                .command
                .execute(&self.ctx, &self.commands, msg, args)
                .await
        } else if !content.trim().is_empty() {
            commands::add_url(&self.ctx, msg, content).await
        } else if let Some(document) = &msg.document {
            commands::add_document(&self.ctx, msg, document).await
        } else {
            return None;
        };

        Some(result.unwrap_or_else(|err| failed(Reply::to(msg), err)))
    }

    async fn handle_callback(&self, query: CallbackQuery) -> Option<Reply> {
        let data = query.data.as_deref().unwrap_or_default();
        let (handler, payload) = match split_payload(data) {
            Some((id, payload)) => (self.ctx.callbacks.consume(id), payload.to_string()),
            None => (None, String::new()),
        };

        if let Err(err) = self.ctx.messenger.answer_callback(&query.id).await {
            return query.message.map(|m| failed(Reply::edit(m), err));
        }

        let Some(message) = query.message else {
            tracing::debug!("Callback {} has no message attached", query.id);
            return None;
        };
        let Some(handler) = handler else {
            return Some(Reply::edit(message).text(text::EXPIRED_BUTTONS));
        };

        let result = handler(CallbackRequest {
            message,
            data: payload,
        })
        .await;
        Some(result.unwrap_or_else(|err| failed(Reply::edit(message), err)))
    }
}

fn failed(reply: Reply, err: BotError) -> Reply {
    tracing::error!("Handler failed: {}", err);
    reply.error(&err)
}
