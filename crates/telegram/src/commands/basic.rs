//! Basic bot commands (start, help)

use super::CommandTable;
use crate::constants::text;
use crate::reply::Reply;
use crate::types::Message;

/// Greet the user
pub fn start(msg: &Message) -> Reply {
    Reply::to(msg).text(text::GREETING)
}

/// Display help message with available commands
pub fn help(msg: &Message, table: &CommandTable) -> Reply {
    Reply::to(msg).text(table.help_text())
}
