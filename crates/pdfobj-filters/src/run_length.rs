//! `RunLengthDecode` — length byte 0..=127 copies `length + 1` literal
//! bytes, 129..=255 repeats the next byte `257 - length` times, 128 ends
//! the data.

use crate::FilterError;

pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 128 + 2);
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        let mut run = 1;
        while i + run < data.len() && data[i + run] == b && run < 128 {
            run += 1;
        }
        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(b);
            i += run;
        } else {
            let start = i;
            i += 1;
            while i < data.len() && i - start < 128 {
                if i + 1 < data.len() && data[i + 1] == data[i] {
                    break;
                }
                i += 1;
            }
            out.push((i - start - 1) as u8);
            out.extend_from_slice(&data[start..i]);
        }
    }
    out.push(128);
    out
}

pub fn decode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        let length = data[i];
        i += 1;
        if length == 128 {
            break;
        }
        if length < 128 {
            let n = length as usize + 1;
            if i + n > data.len() {
                return Err(FilterError::TruncatedRun);
            }
            out.extend_from_slice(&data[i..i + n]);
            i += n;
        } else {
            if i >= data.len() {
                return Err(FilterError::TruncatedRun);
            }
            out.extend(std::iter::repeat(data[i]).take(257 - length as usize));
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_runs() {
        // 5 x 'a' -> run chunk, trailing EOD
        assert_eq!(encode(b"aaaaa"), [252, b'a', 128]);
    }

    #[test]
    fn encodes_literals() {
        assert_eq!(encode(b"abc"), [2, b'a', b'b', b'c', 128]);
    }

    #[test]
    fn round_trips_mixed() {
        let data = b"aaabcccccdeeff\x00\x00\x00g";
        assert_eq!(decode(&encode(data)).unwrap(), data);
    }

    #[test]
    fn decode_stops_at_eod() {
        assert_eq!(decode(&[0, b'x', 128, 0, b'y']).unwrap(), b"x");
    }

    #[test]
    fn rejects_truncated_literal() {
        assert_eq!(decode(&[5, b'a']), Err(FilterError::TruncatedRun));
    }

    #[test]
    fn rejects_missing_run_byte() {
        assert_eq!(decode(&[255]), Err(FilterError::TruncatedRun));
    }

    #[test]
    fn long_run_splits_at_128() {
        let data = vec![7u8; 300];
        let encoded = encode(&data);
        assert_eq!(decode(&encoded).unwrap(), data);
    }
}
