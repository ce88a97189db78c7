//! Message rendering helpers
//!
//! Everything here produces MarkdownV2 text. Values coming from the daemon
//! or the user are escaped before they are interpolated.

use std::fmt::Write;

use torrent::{NewTorrent, SessionStats, Torrent};

use crate::utils::{capitalize, escape_markdown_v2 as escape, format_bytes, format_eta};

/// Format the confirmation for a freshly added torrent
///
/// # Arguments
/// * `torrent` - Torrent reported by the daemon
/// * `path` - Download directory chosen by the user, if any
pub fn format_new_torrent(torrent: &NewTorrent, path: Option<&str>) -> String {
    let mut text = format!("👌 \\<*{}*\\> {}", torrent.id, escape(&torrent.name));
    if let Some(path) = path {
        let _ = write!(text, "\n\nWill be downloaded to *{}*", escape(path));
    }
    text
}

/// Format session statistics as a single line
///
/// The ratio is uploaded over downloaded without a zero guard, a fresh
/// session renders as `NaN`.
pub fn format_stats(stats: &SessionStats, turtle: bool) -> String {
    let ratio = stats.uploaded as f64 / stats.downloaded as f64;
    format!(
        "↓*{}/s* ↑*{}/s* {}   ↻*{}* ⊗*{}*   ↓*{}* ↑*{}* ☯*{}*",
        escape(&format_bytes(stats.download_rate)),
        escape(&format_bytes(stats.upload_rate)),
        if turtle { "🐢" } else { "🚀" },
        stats.active_torrents,
        stats.paused_torrents,
        escape(&format_bytes(stats.downloaded)),
        escape(&format_bytes(stats.uploaded)),
        escape(&format!("{:.2}", ratio)),
    )
}

pub fn format_turtle(enabled: bool) -> &'static str {
    if enabled {
        "Turtle mode is now *enabled* 🐢"
    } else {
        "Turtle mode is now *disabled* 🚀"
    }
}

/// Format a torrent list, one block per torrent
pub fn format_torrent_list(torrents: &[Torrent]) -> String {
    if torrents.is_empty() {
        return "Don't have any matching torrent".to_string();
    }

    let mut text = String::from("Here is what I got:\n");
    for t in torrents {
        let perc = t.valid_size as f64 / t.wanted_size as f64 * 100.0;
        let _ = write!(
            text,
            "\n\\<*{}*\\> *{}*\n{} *{}* of *{}* \\(*{}%*\\)   ↓*{}/s* ↑*{}/s*",
            t.id,
            escape(&t.name),
            capitalize(&t.status.to_string()),
            escape(&format_bytes(t.valid_size)),
            escape(&format_bytes(t.wanted_size)),
            escape(&format!("{:.1}", perc)),
            escape(&format_bytes(t.download_rate)),
            escape(&format_bytes(t.upload_rate)),
        );
        if t.upload_ratio > 0.0 {
            let _ = write!(text, " ☯*{}*", escape(&format!("{:.2}", t.upload_ratio)));
        }
        if t.eta > 0 {
            let _ = write!(text, "   ETA: *{}*", escape(&format_eta(t.eta)));
        }
        text.push('\n');
    }
    text
}

/// Format the removal confirmation prompt
pub fn format_removal(torrents: &[Torrent]) -> String {
    let mut text = String::from("I'm going to remove the following torrents:\n\n");
    for t in torrents {
        let _ = writeln!(text, "\\<*{}*\\> *{}*", t.id, escape(&t.name));
    }
    text.push_str("\nShould I remove their data files as well?");
    text
}
