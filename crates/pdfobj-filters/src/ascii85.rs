//! `ASCII85Decode` — 4 bytes to 5 characters in `!`..`u`, `z` for a zero
//! group, `~>` terminator.

use crate::FilterError;

pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 4 * 5 + 6);
    for chunk in data.chunks(4) {
        let mut word = 0u32;
        for (i, &b) in chunk.iter().enumerate() {
            word |= (b as u32) << (24 - 8 * i);
        }
        if chunk.len() == 4 && word == 0 {
            out.push(b'z');
            continue;
        }
        let mut digits = [0u8; 5];
        let mut w = word;
        for slot in digits.iter_mut().rev() {
            *slot = (w % 85) as u8 + b'!';
            w /= 85;
        }
        // a partial group of n bytes encodes to n+1 characters
        out.extend_from_slice(&digits[..chunk.len() + 1]);
    }
    out.extend_from_slice(b"~>");
    out
}

pub fn decode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::with_capacity(data.len() / 5 * 4);
    let mut group = [0u8; 5];
    let mut filled = 0usize;
    for &c in data {
        match c {
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\0' => continue,
            b'~' => break,
            b'z' if filled == 0 => out.extend_from_slice(&[0, 0, 0, 0]),
            b'z' => return Err(FilterError::InvalidAscii85("z inside a group")),
            b'!'..=b'u' => {
                group[filled] = c - b'!';
                filled += 1;
                if filled == 5 {
                    out.extend_from_slice(&combine(&group)?);
                    filled = 0;
                }
            }
            _ => return Err(FilterError::InvalidAscii85("character out of range")),
        }
    }
    match filled {
        0 => {}
        1 => return Err(FilterError::InvalidAscii85("single trailing character")),
        n => {
            // pad the partial group with 'u' digits, keep n-1 bytes
            let mut padded = group;
            for slot in padded.iter_mut().skip(n) {
                *slot = 84;
            }
            let bytes = combine(&padded)?;
            out.extend_from_slice(&bytes[..n - 1]);
        }
    }
    Ok(out)
}

fn combine(digits: &[u8; 5]) -> Result<[u8; 4], FilterError> {
    let mut word = 0u64;
    for &d in digits {
        word = word * 85 + d as u64;
    }
    if word > u32::MAX as u64 {
        return Err(FilterError::InvalidAscii85("group value overflow"));
    }
    Ok((word as u32).to_be_bytes())
}
