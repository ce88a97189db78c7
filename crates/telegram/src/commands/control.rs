//! Daemon control commands (port check, stats, turtle mode, resume, stop)

use torrent::SessionFlag;

use super::Context;
use crate::constants::text;
use crate::error::BotResult;
use crate::handlers;
use crate::reply::Reply;
use crate::types::Message;
use crate::utils;

/// Report whether the peer port is reachable
pub async fn check_port(ctx: &Context, msg: &Message) -> BotResult<Reply> {
    let open = ctx.daemon.is_port_open().await?;
    let answer = if open {
        text::PORT_OPEN
    } else {
        text::PORT_CLOSED
    };
    Ok(Reply::to(msg).text(answer))
}

/// Show transfer rates, torrent counts and totals
pub async fn stats(ctx: &Context, msg: &Message) -> BotResult<Reply> {
    let stats = ctx.daemon.session_stats().await?;
    let turtle = ctx.daemon.session_flag(SessionFlag::Turtle).await?;
    Ok(Reply::to(msg)
        .text(handlers::format_stats(&stats, turtle))
        .markdown())
}

/// Switch alternative speed limits on or off
pub async fn set_turtle(ctx: &Context, msg: &Message, enabled: bool) -> BotResult<Reply> {
    ctx.daemon
        .set_session_flag(SessionFlag::Turtle, enabled)
        .await?;
    tracing::info!("Turtle mode {}", if enabled { "enabled" } else { "disabled" });
    Ok(Reply::to(msg).text(handlers::format_turtle(enabled)).markdown())
}

/// Resume the given torrents, all of them when no IDs are given
pub async fn resume(ctx: &Context, msg: &Message, args: &str) -> BotResult<Reply> {
    let ids = utils::parse_torrent_ids(args)?;
    ctx.daemon.start_torrents(&ids).await?;
    tracing::info!("Resumed torrents: {:?}", ids);
    Ok(Reply::to(msg).text(text::DONE))
}

/// Stop the given torrents, all of them when no IDs are given
pub async fn stop(ctx: &Context, msg: &Message, args: &str) -> BotResult<Reply> {
    let ids = utils::parse_torrent_ids(args)?;
    ctx.daemon.stop_torrents(&ids).await?;
    tracing::info!("Stopped torrents: {:?}", ids);
    Ok(Reply::to(msg).text(text::DONE))
}
