//! Building property graphs from raw tokens.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{ObjectError, Result};
use crate::property::{IndirectRef, Property};
use crate::resolve::DocumentStore;
use crate::token::{RawToken, TokenSource};

/// Builds a detached property graph from one raw token. Fails without
/// partial effects; the error names what the token got wrong.
pub fn decode_token(token: &RawToken) -> Result<Property> {
    match token {
        RawToken::Null => Ok(Property::null()),
        RawToken::Bool(v) => Ok(Property::bool(*v)),
        RawToken::Int(v) => Ok(Property::int(*v)),
        RawToken::Real(v) => Ok(Property::real(*v)),
        RawToken::Str(v) => Ok(Property::string(v.clone())),
        RawToken::Name(v) => Ok(Property::name(v.clone())),
        RawToken::Ref { num, gen } => Ok(Property::reference(IndirectRef::new(*num, *gen))),
        RawToken::Array(items) => {
            let children = items.iter().map(decode_token).collect::<Result<Vec<_>>>()?;
            Ok(Property::array_from(children))
        }
        RawToken::Dict(entries) => Ok(Property::dict_from_map(decode_entries(entries)?)),
        RawToken::Stream { dict, data } => {
            let data = data.as_ref().ok_or_else(|| {
                ObjectError::InvalidOperation(
                    "stream body not loaded; decode through a token source".to_string(),
                )
            })?;
            decode_stream(dict, data.clone())
        }
    }
}

/// Decodes an object and attaches the result to `doc` under `target`.
/// Failures are wrapped with the object's identity for diagnostics.
pub fn decode_attached(
    token: &RawToken,
    doc: &Rc<dyn DocumentStore>,
    target: IndirectRef,
) -> Result<Property> {
    let prop = decode_token(token).map_err(|source| ObjectError::DecodeFailed {
        num: target.num,
        gen: target.gen,
        source: Box::new(source),
    })?;
    prop.attach(doc, target);
    Ok(prop)
}

/// Decodes the next object from a pull source. When the source defers a
/// stream body, the declared `Length` worth of bytes is pulled here.
/// Yields `None` at end of input.
pub fn decode_from_source(source: &mut dyn TokenSource) -> Result<Option<Property>> {
    let token = match source.next_token()? {
        Some(token) => token,
        None => return Ok(None),
    };
    match token {
        RawToken::Stream { dict, data: None } => {
            let data = load_stream_body(&dict, source)?;
            decode_stream(&dict, data).map(Some)
        }
        other => decode_token(&other).map(Some),
    }
}

fn decode_entries(entries: &[(String, RawToken)]) -> Result<IndexMap<String, Property>> {
    let mut out = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        let child = decode_token(value)?;
        if out.insert(key.clone(), child).is_some() {
            tracing::debug!(key = %key, "duplicate dictionary key, keeping the later value");
        }
    }
    Ok(out)
}

fn decode_stream(dict: &[(String, RawToken)], data: Vec<u8>) -> Result<Property> {
    let length = declared_length(dict)?;
    if data.len() != length {
        return Err(ObjectError::MalformedStream(format!(
            "declared Length {length} but {} bytes are available",
            data.len()
        )));
    }
    Ok(Property::stream_from(decode_entries(dict)?, data))
}

/// `Length` must be a direct, non-negative integer token.
fn declared_length(dict: &[(String, RawToken)]) -> Result<usize> {
    let token = dict
        .iter()
        .rev()
        .find(|(key, _)| key == "Length")
        .map(|(_, value)| value)
        .ok_or_else(|| {
            ObjectError::MalformedStream("stream dictionary has no Length entry".to_string())
        })?;
    match token {
        RawToken::Int(value) if *value >= 0 => Ok(*value as usize),
        RawToken::Int(value) => Err(ObjectError::MalformedStream(format!(
            "negative stream Length {value}"
        ))),
        other => Err(ObjectError::MalformedStream(format!(
            "stream Length must be a direct integer, found {other:?}"
        ))),
    }
}

fn load_stream_body(dict: &[(String, RawToken)], source: &mut dyn TokenSource) -> Result<Vec<u8>> {
    let length = declared_length(dict)?;
    let data = source.read_stream_bytes(length)?;
    if data.len() != length {
        return Err(ObjectError::MalformedStream(format!(
            "declared Length {length} but only {} bytes were read",
            data.len()
        )));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyType;

    #[test]
    fn scalars_decode() {
        assert_eq!(
            decode_token(&RawToken::Null).unwrap().property_type(),
            PropertyType::Null
        );
        assert!(decode_token(&RawToken::Bool(true)).unwrap().as_bool().unwrap());
        assert_eq!(
            decode_token(&RawToken::Int(-9)).unwrap().as_int().unwrap(),
            -9
        );
        assert_eq!(
            decode_token(&RawToken::Name("Type".into()))
                .unwrap()
                .as_name()
                .unwrap(),
            "Type"
        );
        assert_eq!(
            decode_token(&RawToken::Ref { num: 4, gen: 1 })
                .unwrap()
                .as_reference()
                .unwrap(),
            IndirectRef::new(4, 1)
        );
    }

    #[test]
    fn containers_decode_recursively() {
        let token = RawToken::Dict(vec![
            ("Type".into(), RawToken::Name("Example".into())),
            (
                "Kids".into(),
                RawToken::Array(vec![RawToken::Int(1), RawToken::Int(2)]),
            ),
        ]);
        let dict = decode_token(&token).unwrap();
        assert_eq!(dict.keys().unwrap(), ["Type", "Kids"]);
        let kids = dict.get_key("Kids").unwrap();
        assert_eq!(kids.child_count().unwrap(), 2);
        assert!(kids.parent().unwrap().ptr_eq(&dict));
    }

    #[test]
    fn duplicate_key_keeps_later_value() {
        let token = RawToken::Dict(vec![
            ("K".into(), RawToken::Int(1)),
            ("K".into(), RawToken::Int(2)),
        ]);
        let dict = decode_token(&token).unwrap();
        assert_eq!(dict.child_count().unwrap(), 1);
        assert_eq!(dict.get_key("K").unwrap().as_int().unwrap(), 2);
    }

    #[test]
    fn stream_length_must_match_body() {
        let token = RawToken::Stream {
            dict: vec![("Length".into(), RawToken::Int(3))],
            data: Some(b"toolong".to_vec()),
        };
        assert!(matches!(
            decode_token(&token),
            Err(ObjectError::MalformedStream(_))
        ));
    }

    #[test]
    fn stream_without_length_is_malformed() {
        let token = RawToken::Stream {
            dict: vec![],
            data: Some(Vec::new()),
        };
        assert!(matches!(
            decode_token(&token),
            Err(ObjectError::MalformedStream(_))
        ));
    }

    #[test]
    fn indirect_length_token_is_rejected() {
        let token = RawToken::Stream {
            dict: vec![("Length".into(), RawToken::Ref { num: 9, gen: 0 })],
            data: Some(Vec::new()),
        };
        assert!(matches!(
            decode_token(&token),
            Err(ObjectError::MalformedStream(_))
        ));
    }

    #[test]
    fn valid_stream_decodes() {
        let token = RawToken::Stream {
            dict: vec![
                ("Length".into(), RawToken::Int(4)),
                ("Type".into(), RawToken::Name("XObject".into())),
            ],
            data: Some(b"DATA".to_vec()),
        };
        let stream = decode_token(&token).unwrap();
        assert_eq!(stream.property_type(), PropertyType::Stream);
        assert_eq!(stream.raw_buffer().unwrap(), b"DATA");
        assert_eq!(stream.get_key("Length").unwrap().as_int().unwrap(), 4);
    }

    #[test]
    fn decoded_graph_is_detached() {
        let token = RawToken::Array(vec![RawToken::Int(1)]);
        let array = decode_token(&token).unwrap();
        assert!(array.document().is_none());
        assert!(array.self_ref().is_none());
    }
}
