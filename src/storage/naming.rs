//! Item name <-> file name mapping.
//!
//! Bytes in `[A-Za-z0-9_-]` are kept, `.` is kept except as the first byte,
//! and every other byte becomes `%XX` with upper-case hex. The mapping is
//! injective, so distinct item names never share a file, and the output never
//! contains `/`, never starts with `.` and is never `.` or `..`.
//!
//! Escaping can triple a name's length. Names whose encoding exceeds
//! [`MAX_FILE_NAME_LEN`] cannot be stored and are rejected up front.

use std::fmt::Write as _;

/// Longest file name most Linux filesystems accept (`NAME_MAX`).
pub const MAX_FILE_NAME_LEN: usize = 255;

const fn is_plain(byte: u8, position: usize) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' || (byte == b'.' && position > 0)
}

/// Encode an item name as a storage file name.
#[must_use]
pub fn encode_item_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, byte) in name.bytes().enumerate() {
        if is_plain(byte, i) {
            out.push(char::from(byte));
        } else {
            // Writing to a String cannot fail.
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Length in bytes of [`encode_item_name`]'s output, without allocating.
#[must_use]
pub fn encoded_len(name: &str) -> usize {
    name.bytes()
        .enumerate()
        .map(|(i, byte)| if is_plain(byte, i) { 1 } else { 3 })
        .sum()
}

/// Whether `name` encodes to a file name the filesystem accepts.
#[must_use]
pub fn fits_file_name(name: &str) -> bool {
    encoded_len(name) <= MAX_FILE_NAME_LEN
}

/// Decode a storage file name back into the item name.
///
/// Returns `None` for names [`encode_item_name`] could not have produced,
/// such as stray files dropped into a snapshot directory by hand.
#[must_use]
pub fn decode_item_name(file_name: &str) -> Option<String> {
    let bytes = file_name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let value = decode_hex_pair(hex)?;
            if is_plain(value, out.len()) {
                return None;
            }
            out.push(value);
            i += 3;
        } else if is_plain(byte, out.len()) {
            out.push(byte);
            i += 1;
        } else {
            return None;
        }
    }
    String::from_utf8(out).ok()
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let digit = |b: u8| match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    };
    Some((digit(pair[0])? << 4) | digit(pair[1])?)
}
