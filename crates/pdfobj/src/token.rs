//! Raw token boundary between the external tokenizer and this codec.

use crate::error::Result;

/// One raw typed token as produced by the external tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawToken {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    /// Quoted byte string. Every byte is preserved, embedded NULs included.
    Str(Vec<u8>),
    /// Bare identifier, without the leading `/`.
    Name(String),
    /// Two-integer indirect link.
    Ref { num: u32, gen: u16 },
    Array(Vec<RawToken>),
    /// Key/value pairs in the order encountered.
    Dict(Vec<(String, RawToken)>),
    /// Stream dictionary plus its body. `data` holds the bytes found
    /// before the stream terminator; `None` means the tokenizer deferred
    /// the body and the decoder must pull it from the [`TokenSource`]
    /// using the declared `Length`.
    Stream {
        dict: Vec<(String, RawToken)>,
        data: Option<Vec<u8>>,
    },
}

/// Pull-style token input consumed from the external tokenizer.
pub trait TokenSource {
    /// Yields the next raw token, or `None` at end of the token stream.
    fn next_token(&mut self) -> Result<Option<RawToken>>;

    /// Reads up to `len` raw bytes of a deferred stream body immediately
    /// following the stream's dictionary token. Returning fewer bytes
    /// than requested means the underlying data ended early.
    fn read_stream_bytes(&mut self, len: usize) -> Result<Vec<u8>>;
}
