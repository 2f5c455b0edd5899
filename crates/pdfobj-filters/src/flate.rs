//! `FlateDecode` — zlib/deflate compression.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::FilterError;

pub fn encode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| FilterError::Flate(e.to_string()))?;
    encoder.finish().map_err(|e| FilterError::Flate(e.to_string()))
}

pub fn decode(data: &[u8]) -> Result<Vec<u8>, FilterError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| FilterError::Flate(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let data = b"stream stream stream stream stream";
        let encoded = encode(data).unwrap();
        assert_ne!(encoded.as_slice(), data.as_slice());
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn empty_input() {
        let encoded = encode(b"").unwrap();
        assert_eq!(decode(&encoded).unwrap(), b"");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode(b"definitely not zlib"),
            Err(FilterError::Flate(_))
        ));
    }
}
