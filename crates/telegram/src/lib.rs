//! Telegram front-end for a torrent daemon
//!
//! [`TorrentBot`] receives updates through a [`Messenger`], lets allowed
//! users run commands against a [`torrent::Daemon`] and drives the
//! interactive add and remove prompts through a [`CallbackRegistry`].

pub mod auth;
pub mod bot;
pub mod callbacks;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod keyboards;
pub mod reply;
pub mod telegram;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

pub use auth::Authorizer;
pub use bot::TorrentBot;
pub use callbacks::CallbackRegistry;
pub use config::BotConfig;
pub use error::{BotError, BotResult, UserMessage};
pub use reply::Reply;
pub use telegram::{Messenger, TelegramClient};
pub use types::{Location, Update, UpdateKind};
