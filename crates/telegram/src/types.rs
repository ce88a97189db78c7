//! Platform-neutral view of incoming chat updates

/// Telegram user that sent an update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: u64,
    pub username: Option<String>,
}

/// Location of a previously sent message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
}

/// Incoming chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i32,
    pub chat_id: i64,
    pub from: Option<User>,
    pub text: Option<String>,
    pub document: Option<Document>,
}

impl Message {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            chat_id: self.chat_id,
            message_id: self.id,
        }
    }
}

/// Inline button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Message carrying the pressed button, if it is still accessible
    pub message: Option<MessageRef>,
    pub data: Option<String>,
}

/// Update kinds the bot reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    Message(Message),
    CallbackQuery(CallbackQuery),
    /// Anything else the platform delivers; acknowledged and ignored
    Other,
}

/// Incoming update with its acknowledgment sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub id: i32,
    pub kind: UpdateKind,
}

impl Update {
    /// User who triggered the update
    pub fn sender(&self) -> Option<&User> {
        match &self.kind {
            UpdateKind::Message(m) => m.from.as_ref(),
            UpdateKind::CallbackQuery(q) => Some(&q.from),
            UpdateKind::Other => None,
        }
    }

    /// Chat the update originated from
    pub fn chat_id(&self) -> Option<i64> {
        match &self.kind {
            UpdateKind::Message(m) => Some(m.chat_id),
            UpdateKind::CallbackQuery(q) => q.message.map(|m| m.chat_id),
            UpdateKind::Other => None,
        }
    }
}

/// Named download destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub path: String,
}

impl Location {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Configured locations in their configured order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locations(Vec<Location>);

impl Locations {
    pub(crate) fn new(locations: Vec<Location>) -> Self {
        Self(locations)
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.0.iter().find(|l| l.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
