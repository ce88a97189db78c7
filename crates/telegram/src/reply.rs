//! Outgoing messages
//!
//! A [`Reply`] is either a fresh message answering an incoming one or an
//! edit of a message the bot sent earlier. Both are built by chaining
//! option methods; a later option overrides an earlier one touching the same
//! field.

use crate::error::{BotError, UserMessage};
use crate::keyboards::InlineKeyboard;
use crate::types::{Message, MessageRef};

/// Content shared by new messages and edits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub text: String,
    /// Render `text` as MarkdownV2
    pub markdown: bool,
    pub keyboard: Option<InlineKeyboard>,
}

/// New message sent in reply to an incoming one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: i64,
    /// Message this reply was triggered by
    pub origin: Option<i32>,
    /// Visibly quote `origin`
    pub quote: bool,
    pub body: Body,
}

impl NewMessage {
    /// Message ID to reply to, if quoting
    pub fn reply_to(&self) -> Option<i32> {
        self.origin.filter(|_| self.quote)
    }
}

/// Edit of a previously sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub body: Body,
}

/// Outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    New(NewMessage),
    Edit(EditMessage),
}

impl Reply {
    /// Start a new message in the chat of `msg`
    pub fn to(msg: &Message) -> Self {
        Reply::New(NewMessage {
            chat_id: msg.chat_id,
            origin: Some(msg.id),
            quote: false,
            body: Body::default(),
        })
    }

    /// Start a new message in `chat_id` not tied to a specific message
    pub fn to_chat(chat_id: i64) -> Self {
        Reply::New(NewMessage {
            chat_id,
            origin: None,
            quote: false,
            body: Body::default(),
        })
    }

    /// Start an edit of `msg`
    pub fn edit(msg: MessageRef) -> Self {
        Reply::Edit(EditMessage {
            chat_id: msg.chat_id,
            message_id: msg.message_id,
            body: Body::default(),
        })
    }

    pub fn body(&self) -> &Body {
        match self {
            Reply::New(m) => &m.body,
            Reply::Edit(m) => &m.body,
        }
    }

    fn body_mut(&mut self) -> &mut Body {
        match self {
            Reply::New(m) => &mut m.body,
            Reply::Edit(m) => &mut m.body,
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            Reply::New(m) => m.chat_id,
            Reply::Edit(m) => m.chat_id,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body_mut().text = text.into();
        self
    }

    /// Render the text as MarkdownV2. Interpolated values must be escaped
    /// with [`escape_markdown_v2`](crate::utils::escape_markdown_v2).
    pub fn markdown(mut self) -> Self {
        self.body_mut().markdown = true;
        self
    }

    pub fn plain(mut self) -> Self {
        self.body_mut().markdown = false;
        self
    }

    /// Quote the triggering message. Has no effect on edits.
    pub fn quote(mut self) -> Self {
        if let Reply::New(m) = &mut self {
            m.quote = true;
        }
        self
    }

    pub fn keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.body_mut().keyboard = Some(keyboard);
        self
    }

    /// Replace the content with a plain-text description of `err`
    pub fn error(self, err: &BotError) -> Self {
        self.text(err.user_message()).plain()
    }
}
