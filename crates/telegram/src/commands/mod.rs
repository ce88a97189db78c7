//! Command handlers for the Telegram bot
//!
//! Handlers are organized by category:
//! - `basic`: start and help
//! - `control`: port check, statistics, turtle mode, resume and stop
//! - `torrent`: adding, listing and removing torrents

mod basic;
mod control;
mod torrent;

use std::sync::Arc;

use ::torrent::Daemon;

use crate::callbacks::CallbackRegistry;
use crate::error::BotResult;
use crate::reply::Reply;
use crate::telegram::Messenger;
use crate::types::{Locations, Message};

pub use self::torrent::{add_document, add_url};

/// Collaborators shared by all handlers
#[derive(Clone)]
pub struct Context {
    pub messenger: Arc<dyn Messenger>,
    pub daemon: Arc<dyn Daemon>,
    /// Client for fetching uploaded torrent files
    pub http: reqwest::Client,
    pub locations: Arc<Locations>,
    pub callbacks: CallbackRegistry,
}

/// Supported bot commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    CheckPort,
    Stats,
    TurtleOn,
    TurtleOff,
    Resume,
    Stop,
    List,
    Remove,
}

impl Command {
    /// Run the handler of this command
    pub async fn execute(
        self,
        ctx: &Context,
        table: &CommandTable,
        msg: &Message,
        args: &str,
    ) -> BotResult<Reply> {
        match self {
            Command::Start => Ok(basic::start(msg)),
            Command::Help => Ok(basic::help(msg, table)),
            Command::CheckPort => control::check_port(ctx, msg).await,
            Command::Stats => control::stats(ctx, msg).await,
            Command::TurtleOn => control::set_turtle(ctx, msg, true).await,
            Command::TurtleOff => control::set_turtle(ctx, msg, false).await,
            Command::Resume => control::resume(ctx, msg, args).await,
            Command::Stop => control::stop(ctx, msg, args).await,
            Command::List => self::torrent::list(ctx, msg, args).await,
            Command::Remove => self::torrent::remove(ctx, msg, args).await,
        }
    }
}

/// Command name with its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub command: Command,
    pub name: &'static str,
    pub description: &'static str,
    /// Shown in the Telegram command menu
    pub advertised: bool,
}

impl CommandEntry {
    const fn new(command: Command, name: &'static str, description: &'static str) -> Self {
        Self {
            command,
            name,
            description,
            advertised: true,
        }
    }

    const fn hidden(mut self) -> Self {
        self.advertised = false;
        self
    }
}

/// Name to command mapping, in menu order
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        use Command::*;

        let entries = vec![
            CommandEntry::new(Start, "start", "Show the greeting").hidden(),
            CommandEntry::new(Help, "help", "Show available commands"),
            CommandEntry::new(CheckPort, "checkport", "Check if the incoming port is open"),
            CommandEntry::new(Stats, "stats", "Show session statistics"),
            CommandEntry::new(TurtleOn, "turtleon", "Enable turtle mode"),
            CommandEntry::new(TurtleOff, "turtleoff", "Disable turtle mode"),
            CommandEntry::new(Resume, "resume", "Resume specified torrents"),
            CommandEntry::new(Stop, "stop", "Stop specified torrents"),
            CommandEntry::new(List, "list", "List torrents"),
            CommandEntry::new(Remove, "remove", "Remove torrents"),
        ];
        Self { entries }
    }

    /// Look up a command by name, without the leading slash
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Commands to publish to Telegram, in table order
    pub fn advertised(&self) -> Vec<CommandEntry> {
        self.entries.iter().filter(|e| e.advertised).copied().collect()
    }

    /// Plain text listing of the advertised commands
    pub fn help_text(&self) -> String {
        self.advertised()
            .iter()
            .map(|e| format!("/{} - {}", e.name, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
