//! Utility functions for torrent metadata

use data_encoding::{BASE32, HEXLOWER};
use sha1::{Digest, Sha1};

/// Extract info hash from magnet link
///
/// Magnet links have the format: magnet:?xt=urn:btih:HASH&...
/// This function extracts the info hash (HASH) from the link. Base32 hashes
/// are converted to lowercase hex; an undecodable one yields `None`.
pub fn extract_info_hash(magnet_url: &str) -> Option<String> {
    let hash = magnet_param(magnet_url, "xt")?.strip_prefix("urn:btih:")?;
    match hash.len() {
        0 => None,
        BASE32_HASH_LEN => BASE32
            .decode(hash.to_ascii_uppercase().as_bytes())
            .ok()
            .map(|raw| HEXLOWER.encode(&raw)),
        _ => Some(hash.to_lowercase()),
    }
}

/// Length of a base32 encoded SHA-1 info hash
const BASE32_HASH_LEN: usize = 32;

/// Extract the display name (`dn` parameter) from a magnet link
pub fn magnet_display_name(magnet_url: &str) -> Option<String> {
    let raw = magnet_param(magnet_url, "dn")?.replace('+', " ");
    let name = urlencoding::decode(&raw).map(|n| n.into_owned()).unwrap_or(raw);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn magnet_param<'a>(magnet_url: &'a str, key: &str) -> Option<&'a str> {
    let query = magnet_url.strip_prefix("magnet:?")?;
    query.split('&').find_map(|param| {
        let (k, v) = param.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Extract info hash from .torrent file data
///
/// Parses bencoded .torrent file and extracts the SHA-1 hash of the info dictionary.
/// Returns lowercase hex-encoded info hash.
pub fn extract_torrent_info_hash(file_data: &[u8]) -> Option<String> {
    let info_start = find_info_dict_start(file_data)?;
    let info_end = skip_value(file_data, info_start)?;

    let mut hasher = Sha1::new();
    hasher.update(&file_data[info_start..info_end]);
    Some(format!("{:x}", hasher.finalize()))
}

/// Find the start position of the info dictionary in bencoded data
fn find_info_dict_start(data: &[u8]) -> Option<usize> {
    // "4:info" key immediately followed by the dictionary
    const PATTERN: &[u8] = b"4:infod";
    data.windows(PATTERN.len())
        .position(|w| w == PATTERN)
        .map(|i| i + PATTERN.len() - 1)
}

/// Return the position right after the bencoded value starting at `pos`
///
/// Walks the data without recursion; lists and dictionaries only need an
/// open-container count since both end with `e`.
fn skip_value(data: &[u8], pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut cur = pos;
    loop {
        match *data.get(cur)? {
            b'i' => {
                let end = data[cur..].iter().position(|&b| b == b'e')?;
                cur += end + 1;
            }
            b'l' | b'd' => {
                depth += 1;
                cur += 1;
            }
            b'e' if depth > 0 => {
                depth -= 1;
                cur += 1;
            }
            b'0'..=b'9' => {
                let colon = data[cur..].iter().position(|&b| b == b':')? + cur;
                let len: usize = std::str::from_utf8(&data[cur..colon]).ok()?.parse().ok()?;
                let end = colon.checked_add(1)?.checked_add(len)?;
                if end > data.len() {
                    return None;
                }
                cur = end;
            }
            _ => return None,
        }
        if depth == 0 {
            return Some(cur);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_info_hash() {
        // Standard magnet link
        let magnet = "magnet:?xt=urn:btih:abc123def456&dn=Test";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));

        // Magnet with multiple parameters
        let magnet = "magnet:?dn=Test&xt=urn:btih:abc123def456&tr=http://tracker.example.com";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));

        // Invalid magnet
        assert_eq!(extract_info_hash("http://example.com/file.torrent"), None);
        assert_eq!(extract_info_hash("not a magnet link"), None);
        assert_eq!(extract_info_hash("magnet:?xt=urn:btih:"), None);

        // Uppercase hash should be lowercased
        let magnet = "magnet:?xt=urn:btih:ABC123DEF456";
        assert_eq!(extract_info_hash(magnet), Some("abc123def456".to_string()));
    }

    #[test]
    fn test_extract_base32_info_hash() {
        let magnet = "magnet:?xt=urn:btih:YNCKHTQCWBTRNJIV4WNAE52SJUQCZO5C&dn=x";
        assert_eq!(
            extract_info_hash(magnet),
            Some("c344a3ce02b06716a515e59a0277524d202cbba2".to_string())
        );

        // Lowercase base32 decodes the same
        let magnet = "magnet:?xt=urn:btih:ynckhtqcwbtrnjiv4wnae52sjuqczo5c";
        assert_eq!(
            extract_info_hash(magnet),
            Some("c344a3ce02b06716a515e59a0277524d202cbba2".to_string())
        );

        // Not valid base32: hash unknown
        let magnet = "magnet:?xt=urn:btih:1NCKHTQCWBTRNJIV4WNAE52SJUQCZO5C";
        assert_eq!(extract_info_hash(magnet), None);

        // Hex hashes are left alone
        let hex = "C344A3CE02B06716A515E59A0277524D202CBBA2";
        assert_eq!(
            extract_info_hash(&format!("magnet:?xt=urn:btih:{}", hex)),
            Some(hex.to_lowercase())
        );
    }

    #[test]
    fn test_magnet_display_name() {
        let magnet = "magnet:?xt=urn:btih:abc&dn=Some+Linux%20ISO";
        assert_eq!(magnet_display_name(magnet), Some("Some Linux ISO".to_string()));
        assert_eq!(magnet_display_name("magnet:?xt=urn:btih:abc"), None);
        assert_eq!(magnet_display_name("magnet:?dn="), None);
    }

    #[test]
    fn test_extract_torrent_info_hash() {
        // Invalid: not bencoded
        assert!(extract_torrent_info_hash(b"not a torrent").is_none());
        // Invalid: empty
        assert!(extract_torrent_info_hash(b"").is_none());
        // Invalid: no info dict
        assert!(extract_torrent_info_hash(b"d8:announcei0ee").is_none());
        // Invalid: truncated info dict
        assert!(extract_torrent_info_hash(b"d4:infod4:name4:te").is_none());

        let minimal_torrent = b"d4:infod4:name4:testee";
        let hash = extract_torrent_info_hash(minimal_torrent).unwrap();
        assert_eq!(hash.len(), 40);

        // Same info dictionary, different outer keys: same hash
        let other = b"d8:announce3:url4:infod4:name4:testee";
        assert_eq!(extract_torrent_info_hash(other).unwrap(), hash);
    }

    #[test]
    fn test_skip_value_handles_e_inside_strings() {
        let data = b"d4:name5:eeeee6:lengthi42ee";
        assert_eq!(skip_value(data, 0), Some(data.len()));
    }

    #[test]
    fn test_oversized_string_length_is_rejected() {
        assert!(extract_torrent_info_hash(b"d4:infod18446744073709551615:xee").is_none());
        assert!(extract_torrent_info_hash(b"d4:infod99999999999999999999999:xee").is_none());
    }

    #[test]
    fn test_deep_nesting_is_rejected_without_overflow() {
        let mut data = b"d4:infod".to_vec();
        data.extend(std::iter::repeat(b'l').take(1_000_000));
        assert!(extract_torrent_info_hash(&data).is_none());

        // Deep but balanced nesting is still walked
        let mut nested = b"d4:infod4:listl".to_vec();
        nested.extend(std::iter::repeat(b'l').take(10_000));
        nested.extend(std::iter::repeat(b'e').take(10_001));
        nested.extend_from_slice(b"ee");
        assert_eq!(extract_torrent_info_hash(&nested).map(|h| h.len()), Some(40));
    }

    #[test]
    fn test_skip_value_scalars() {
        assert_eq!(skip_value(b"i42e", 0), Some(4));
        assert_eq!(skip_value(b"3:abc", 0), Some(5));
        assert_eq!(skip_value(b"3:ab", 0), None);
        assert_eq!(skip_value(b"e", 0), None);
        assert_eq!(skip_value(b"lee", 0), Some(2));
    }

    #[test]
    fn test_find_info_dict_start() {
        let data = b"d8:announce4:infod4:name4:testee";
        assert_eq!(find_info_dict_start(data), Some(17));
        assert_eq!(data[17], b'd');

        // Pattern at the very end is still found
        assert_eq!(find_info_dict_start(b"4:infod"), Some(6));

        assert!(find_info_dict_start(b"d8:announcei0ee").is_none());
    }
}
