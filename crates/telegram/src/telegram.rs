//! Messaging platform access
//!
//! [`Messenger`] is everything the bot needs from the chat platform.
//! [`TelegramClient`] implements it on top of the Telegram Bot API.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{
        BotCommand, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode,
        UpdateKind as TgUpdateKind,
    },
};

use crate::commands::CommandEntry;
use crate::error::{BotError, BotResult};
use crate::keyboards::InlineKeyboard;
use crate::reply::Reply;
use crate::types::{CallbackQuery, Document, Message, MessageRef, Update, UpdateKind, User};

/// Operations the bot performs on the messaging platform
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Long-poll for updates with an ID of at least `offset`
    async fn fetch_updates(&self, offset: i32, timeout: Duration) -> BotResult<Vec<Update>>;

    /// Send a new message or apply an edit
    async fn send(&self, reply: &Reply) -> BotResult<()>;

    /// Resolve a direct download URL for an uploaded file
    async fn file_url(&self, file_id: &str) -> BotResult<String>;

    /// Acknowledge a button press so the client stops its spinner
    async fn answer_callback(&self, callback_id: &str) -> BotResult<()>;

    /// Replace the command list shown by Telegram clients
    async fn publish_commands(&self, commands: &[CommandEntry]) -> BotResult<()>;
}

/// [`Messenger`] backed by a teloxide [`Bot`]
#[derive(Clone)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Username of the bot account
    pub async fn username(&self) -> BotResult<Option<String>> {
        let me = self.bot.get_me().await?;
        Ok(me.user.username.clone())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn fetch_updates(&self, offset: i32, timeout: Duration) -> BotResult<Vec<Update>> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset)
            .timeout(timeout.as_secs() as u32)
            .await?;
        Ok(updates.into_iter().map(convert_update).collect())
    }

    async fn send(&self, reply: &Reply) -> BotResult<()> {
        match reply {
            Reply::New(m) => {
                let mut req = self.bot.send_message(ChatId(m.chat_id), m.body.text.clone());
                if m.body.markdown {
                    req = req.parse_mode(ParseMode::MarkdownV2);
                }
                if let Some(id) = m.reply_to() {
                    req = req.reply_to_message_id(MessageId(id));
                }
                if let Some(kb) = &m.body.keyboard {
                    req = req.reply_markup(markup(kb));
                }
                req.await?;
            }
            Reply::Edit(m) => {
                let mut req = self.bot.edit_message_text(
                    ChatId(m.chat_id),
                    MessageId(m.message_id),
                    m.body.text.clone(),
                );
                if m.body.markdown {
                    req = req.parse_mode(ParseMode::MarkdownV2);
                }
                if let Some(kb) = &m.body.keyboard {
                    req = req.reply_markup(markup(kb));
                }
                req.await?;
            }
        }
        Ok(())
    }

    async fn file_url(&self, file_id: &str) -> BotResult<String> {
        let file = self.bot.get_file(file_id.to_string()).await?;
        let url = self
            .bot
            .api_url()
            .join(&format!("file/bot{}/{}", self.bot.token(), file.path))
            .map_err(|e| BotError::Transport(format!("invalid file URL: {}", e)))?;
        Ok(url.to_string())
    }

    async fn answer_callback(&self, callback_id: &str) -> BotResult<()> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await?;
        Ok(())
    }

    async fn publish_commands(&self, commands: &[CommandEntry]) -> BotResult<()> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|c| BotCommand::new(c.name, c.description))
            .collect();
        self.bot.set_my_commands(commands).await?;
        Ok(())
    }
}

/// Convert an inline keyboard to its Telegram representation
fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn convert_user(user: &teloxide::types::User) -> User {
    User {
        id: user.id.0,
        username: user.username.clone(),
    }
}

fn convert_message(msg: &teloxide::types::Message) -> Message {
    Message {
        id: msg.id.0,
        chat_id: msg.chat.id.0,
        from: msg.from().map(convert_user),
        text: msg.text().map(str::to_string),
        document: msg.document().map(|d| Document {
            file_id: d.file.id.clone(),
            file_name: d.file_name.clone(),
        }),
    }
}

fn convert_update(update: teloxide::types::Update) -> Update {
    let kind = match &update.kind {
        TgUpdateKind::Message(msg) => UpdateKind::Message(convert_message(msg)),
        TgUpdateKind::CallbackQuery(q) => UpdateKind::CallbackQuery(CallbackQuery {
            id: q.id.clone(),
            from: convert_user(&q.from),
            message: q.message.as_ref().map(|m| MessageRef {
                chat_id: m.chat.id.0,
                message_id: m.id.0,
            }),
            data: q.data.clone(),
        }),
        _ => UpdateKind::Other,
    };
    Update {
        id: update.id,
        kind,
    }
}
