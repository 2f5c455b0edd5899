//! Error types for model and codec operations.

use pdfobj_filters::FilterError;
use thiserror::Error;

use crate::property::PropertyType;

pub type Result<T> = std::result::Result<T, ObjectError>;

#[derive(Debug, Error)]
pub enum ObjectError {
    /// An accessor was called on a node of the wrong kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Missing key, index, object id, or observer.
    #[error("not found: {0}")]
    NotFound(String),
    /// A stream's declared length is inconsistent with its actual data.
    #[error("malformed stream: {0}")]
    MalformedStream(String),
    /// The operation is not valid in the node's current state, e.g.
    /// resolving a detached reference or adding a duplicate key.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A declared stream filter is not implemented by the codec.
    #[error("unsupported stream filter /{0}")]
    UnsupportedFilter(String),
    /// A subtree failed to decode; names the indirect object it belongs to.
    #[error("failed to decode object {num} {gen}: {source}")]
    DecodeFailed {
        num: u32,
        gen: u16,
        #[source]
        source: Box<ObjectError>,
    },
    /// Corrupt data met while running a filter transform.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl ObjectError {
    pub(crate) fn mismatch(expected: &'static str, found: PropertyType) -> ObjectError {
        ObjectError::TypeMismatch {
            expected,
            found: found.name(),
        }
    }
}
