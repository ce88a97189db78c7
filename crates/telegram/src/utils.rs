//! Utility functions for formatting and parsing

use crate::error::{BotError, BotResult};
use torrent::TorrentRef;

/// Format a byte count using binary (IEC) units
///
/// Values below 10 of a unit get one decimal place, e.g. `1.0 KiB`,
/// `2.3 GiB`, `512 B`, `100 MiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut unit_index = 0;
    let mut divisor = 1u64;
    while unit_index < UNITS.len() - 1 && bytes / divisor >= 1024 {
        divisor *= 1024;
        unit_index += 1;
    }

    let value = (bytes as f64 / divisor as f64 * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, UNITS[unit_index])
    } else {
        format!("{:.0} {}", value, UNITS[unit_index])
    }
}

/// Format ETA (seconds) to human-readable duration
pub fn format_eta(seconds: i64) -> String {
    if seconds <= 0 {
        return "∞".to_string();
    }

    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Uppercase the first character of `s`
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a `/command@bot args` message into command name and arguments
///
/// Returns `None` if the text is not a command.
pub fn split_command(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('/')?;
    let (command, args) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], rest[pos..].trim()),
        None => (rest, ""),
    };
    let command = command.split('@').next().unwrap_or_default();
    if command.is_empty() {
        return None;
    }
    Some((command, args))
}

/// Parse whitespace separated torrent IDs
///
/// Blank input selects all torrents. Any token that is not a number is an
/// error.
pub fn parse_torrent_ids(args: &str) -> BotResult<TorrentRef> {
    let ids = args
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| BotError::InvalidTorrentId(token.to_string()))
        })
        .collect::<BotResult<Vec<_>>>()?;

    if ids.is_empty() {
        Ok(TorrentRef::All)
    } else {
        Ok(TorrentRef::ids(ids))
    }
}

/// Escape special characters for MarkdownV2
///
/// Escapes: \_*[]()~`>#+-=|{}.!
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '='
                | '|' | '{' | '}' | '.' | '!'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
