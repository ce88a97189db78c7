//! Torrent management commands (add, list, remove)
//!
//! Adding with configured locations and removing are two-step flows: the
//! first reply carries inline buttons, and the follow-up runs in a callback
//! handler that edits the prompt with the outcome.

use std::sync::Arc;

use torrent::{AddTorrent, Daemon, Torrent, TorrentField, TorrentRef, TorrentSource};

use super::Context;
use crate::callbacks::CallbackRequest;
use crate::constants::{text, token};
use crate::error::{BotError, BotResult};
use crate::handlers;
use crate::keyboards;
use crate::reply::Reply;
use crate::types::{Document, Locations, Message};
use crate::utils;

const LIST_FIELDS: [TorrentField; 9] = [
    TorrentField::Id,
    TorrentField::Name,
    TorrentField::Status,
    TorrentField::ValidSize,
    TorrentField::WantedSize,
    TorrentField::DownloadRate,
    TorrentField::UploadRate,
    TorrentField::UploadRatio,
    TorrentField::Eta,
];

const REMOVE_FIELDS: [TorrentField; 3] = [TorrentField::Id, TorrentField::Hash, TorrentField::Name];

/// Add a torrent from a magnet link or URL sent as text
pub async fn add_url(ctx: &Context, msg: &Message, url: &str) -> BotResult<Reply> {
    let req = AddTorrent::new(TorrentSource::Url(url.trim().to_string()));
    add_torrent(ctx, msg, req).await
}

/// Add a torrent from an uploaded .torrent file
pub async fn add_document(ctx: &Context, msg: &Message, document: &Document) -> BotResult<Reply> {
    let url = ctx.messenger.file_url(&document.file_id).await?;
    let data = ctx
        .http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    tracing::info!(
        "Fetched torrent file {} ({} bytes)",
        document.file_name.as_deref().unwrap_or("<unnamed>"),
        data.len()
    );
    let req = AddTorrent::new(TorrentSource::Metainfo(data.to_vec()));
    add_torrent(ctx, msg, req).await
}

async fn add_torrent(ctx: &Context, msg: &Message, req: AddTorrent) -> BotResult<Reply> {
    if ctx.locations.is_empty() {
        let torrent = ctx.daemon.add_torrent(req).await?;
        tracing::info!("Added torrent {} ({})", torrent.id, torrent.name);
        return Ok(Reply::to(msg)
            .text(handlers::format_new_torrent(&torrent, None))
            .markdown()
            .quote());
    }

    let daemon = Arc::clone(&ctx.daemon);
    let locations = Arc::clone(&ctx.locations);
    let id = ctx.callbacks.register(move |cb: CallbackRequest| async move {
        add_to_location(daemon.as_ref(), &locations, req, cb).await
    });

    Ok(Reply::to(msg)
        .text(text::ASK_LOCATION)
        .keyboard(keyboards::location_keyboard(&id, &ctx.locations))
        .quote())
}

/// Finish an add prompt once the user picked a location
async fn add_to_location(
    daemon: &dyn Daemon,
    locations: &Locations,
    mut req: AddTorrent,
    cb: CallbackRequest,
) -> BotResult<Reply> {
    let path = match cb.data.as_str() {
        token::CANCEL => return Ok(Reply::edit(cb.message).text(text::ADD_CANCELLED)),
        token::OTHER => None,
        name => {
            let location = locations
                .get(name)
                .ok_or_else(|| BotError::UnknownLocation(name.to_string()))?;
            Some(location.path.clone())
        }
    };

    req.download_dir = path.clone();
    let torrent = daemon.add_torrent(req).await?;
    tracing::info!(
        "Added torrent {} ({}) to {}",
        torrent.id,
        torrent.name,
        path.as_deref().unwrap_or("the default location")
    );

    Ok(Reply::edit(cb.message)
        .text(handlers::format_new_torrent(&torrent, path.as_deref()))
        .markdown())
}

/// List torrents whose name contains `args`, ignoring case
pub async fn list(ctx: &Context, msg: &Message, args: &str) -> BotResult<Reply> {
    let torrents = ctx.daemon.torrents(&TorrentRef::All, &LIST_FIELDS).await?;

    let filter = args.trim().to_lowercase();
    let matching: Vec<Torrent> = torrents
        .into_iter()
        .filter(|t| filter.is_empty() || t.name.to_lowercase().contains(&filter))
        .collect();

    Ok(Reply::to(msg)
        .text(handlers::format_torrent_list(&matching))
        .markdown())
}

/// Ask for confirmation before removing the given torrents
pub async fn remove(ctx: &Context, msg: &Message, args: &str) -> BotResult<Reply> {
    let ids = utils::parse_torrent_ids(args)?;
    let torrents = ctx.daemon.torrents(&ids, &REMOVE_FIELDS).await?;
    if torrents.is_empty() {
        return Ok(Reply::to(msg).text(text::NOTHING_TO_REMOVE));
    }

    // Numeric IDs may be reassigned before the user answers
    let hashes = TorrentRef::hashes(torrents.iter().map(|t| t.hash.clone()));
    let daemon = Arc::clone(&ctx.daemon);
    let id = ctx.callbacks.register(move |cb: CallbackRequest| async move {
        confirm_removal(daemon.as_ref(), hashes, cb).await
    });

    Ok(Reply::to(msg)
        .text(handlers::format_removal(&torrents))
        .markdown()
        .keyboard(keyboards::removal_keyboard(&id)))
}

async fn confirm_removal(
    daemon: &dyn Daemon,
    hashes: TorrentRef,
    cb: CallbackRequest,
) -> BotResult<Reply> {
    let delete_data = match cb.data.as_str() {
        token::YES => true,
        token::NO => false,
        _ => return Ok(Reply::edit(cb.message).text(text::REMOVE_CANCELLED)),
    };

    daemon.remove_torrents(&hashes, delete_data).await?;
    tracing::info!("Removed torrents {:?} (delete data: {})", hashes, delete_data);
    Ok(Reply::edit(cb.message).text(text::DONE))
}
