//! `pdfobj` — typed document object model for PDF-style object syntax.
//!
//! The model is a graph of [`Property`] nodes: scalars, arrays,
//! insertion-ordered dictionaries, and streams with filtered byte
//! buffers. Containers own their children, every mutation publishes a
//! [`ChangeContext`] to subscribed observers, and indirect references
//! resolve through a pluggable [`DocumentStore`].
//!
//! The codec at the bottom converts between nodes and their canonical
//! byte form: [`decode_token`] builds a graph from tokenizer output, and
//! [`Property::string_representation`] emits the deterministic syntax
//! form back.
//!
//! # Example
//!
//! ```
//! use pdfobj::Property;
//!
//! let dict = Property::dict();
//! dict.set_key("Type", Property::name("Example"))?;
//! dict.set_key("Count", Property::int(3))?;
//! assert_eq!(
//!     dict.string_representation(),
//!     b"<<\n/Type /Example\n/Count 3\n>>"
//! );
//! # Ok::<(), pdfobj::ObjectError>(())
//! ```

mod array;
mod decode;
mod dict;
mod encode;
mod error;
pub mod helpers;
mod notify;
mod property;
mod resolve;
mod stream;
mod token;

pub use decode::{decode_attached, decode_from_source, decode_token};
pub use encode::{indirect_representation, to_token};
pub use error::{ObjectError, Result};
pub use notify::{ChangeContext, ChangeKind, ChangeObserver, ChildKey};
pub use pdfobj_filters::{Filter, FilterError};
pub use property::{Children, IndirectRef, Property, PropertyType};
pub use resolve::{resolve, DocumentStore};
pub use token::{RawToken, TokenSource};
