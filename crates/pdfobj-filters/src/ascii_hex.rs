//! `ASCIIHexDecode` — two hex digits per byte, `>` terminator.

use crate::FilterError;

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2 + 1);
    for &b in data {
        out.push(UPPER_HEX[(b >> 4) as usize]);
        out.push(UPPER_HEX[(b & 0x0f) as usize]);
    }
    out.push(b'>');
    out
}

/// Whitespace between digits is ignored; data ends at `>` or end of input.
/// An odd trailing digit stands for a byte with a zero low nibble.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut high: Option<u8> = None;
    for &c in data {
        match c {
            b'>' => break,
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\0' => continue,
            _ => {
                let nibble = hex_value(c).ok_or(FilterError::InvalidHexDigit(c))?;
                match high.take() {
                    Some(h) => out.push(h << 4 | nibble),
                    None => high = Some(nibble),
                }
            }
        }
    }
    if let Some(h) = high {
        out.push(h << 4);
    }
    Ok(out)
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
