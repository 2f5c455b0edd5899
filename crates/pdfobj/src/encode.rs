//! Canonical byte form of every node kind.
//!
//! Output is deterministic: a given value always yields the same bytes,
//! with dictionary entries in their stored order. Strings and names are
//! escaped so the form survives a round trip through a tokenizer.

use crate::property::{IndirectRef, Property, Value};
use crate::token::RawToken;

/// Canonical form of `prop`. Streams emit their RAW buffer between the
/// body markers.
pub fn string_representation(prop: &Property) -> Vec<u8> {
    let mut out = Vec::new();
    write_property(prop, &mut out);
    out
}

/// Stream form with `body` substituted for the stored buffer. The
/// dictionary (including `Length`) is emitted as stored.
pub(crate) fn stream_representation(prop: &Property, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    if let Value::Stream { dict, .. } = &prop.0.borrow().value {
        write_dict(dict.iter().map(|(k, v)| (k.as_str(), v)), &mut out);
        out.extend_from_slice(b"\nstream\n");
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendstream");
    }
    out
}

/// Full indirect-object wrapper around a node's canonical form.
pub fn indirect_representation(target: IndirectRef, prop: &Property) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("{} {} obj \n", target.num, target.gen).as_bytes());
    write_property(prop, &mut out);
    out.extend_from_slice(b"\nendobj");
    out
}

fn write_property(prop: &Property, out: &mut Vec<u8>) {
    match &prop.0.borrow().value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Int(v) => out.extend_from_slice(v.to_string().as_bytes()),
        Value::Real(v) => out.extend_from_slice(format_real(*v).as_bytes()),
        Value::String(v) => {
            out.push(b'(');
            escape_string_into(v, out);
            out.push(b')');
        }
        Value::Name(v) => {
            out.push(b'/');
            out.extend_from_slice(escape_name(v).as_bytes());
        }
        Value::Ref(v) => {
            out.extend_from_slice(format!("{} {} R", v.num, v.gen).as_bytes());
        }
        Value::Array(items) => {
            out.push(b'[');
            for item in items {
                out.push(b' ');
                write_property(item, out);
            }
            out.extend_from_slice(b" ]");
        }
        Value::Dict(entries) => {
            write_dict(entries.iter().map(|(k, v)| (k.as_str(), v)), out);
        }
        Value::Stream { dict, raw } => {
            write_dict(dict.iter().map(|(k, v)| (k.as_str(), v)), out);
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(raw);
            out.extend_from_slice(b"\nendstream");
        }
    }
}

fn write_dict<'a>(entries: impl Iterator<Item = (&'a str, &'a Property)>, out: &mut Vec<u8>) {
    out.extend_from_slice(b"<<");
    for (key, value) in entries {
        out.push(b'\n');
        out.push(b'/');
        out.extend_from_slice(escape_name(key).as_bytes());
        out.push(b' ');
        write_property(value, out);
    }
    out.extend_from_slice(b"\n>>");
}

/// Shortest decimal form that parses back to the same value.
fn format_real(value: f64) -> String {
    value.to_string()
}

fn escape_string_into(bytes: &[u8], out: &mut Vec<u8>) {
    for &byte in bytes {
        match byte {
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x20..=0x7e => out.push(byte),
            other => out.extend_from_slice(format!("\\{other:03o}").as_bytes()),
        }
    }
}

/// Regular name characters pass through; everything else becomes a
/// two-digit uppercase `#XX` escape.
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &byte in name.as_bytes() {
        let delimiter = matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        );
        if delimiter || !(0x21..=0x7e).contains(&byte) {
            out.push('#');
            out.push_str(&format!("{byte:02X}"));
        } else {
            out.push(byte as char);
        }
    }
    out
}

/// Lowers a node back to the raw token it would decode from; the inverse
/// of the decoder for every kind.
pub fn to_token(prop: &Property) -> RawToken {
    match &prop.0.borrow().value {
        Value::Null => RawToken::Null,
        Value::Bool(v) => RawToken::Bool(*v),
        Value::Int(v) => RawToken::Int(*v),
        Value::Real(v) => RawToken::Real(*v),
        Value::String(v) => RawToken::Str(v.clone()),
        Value::Name(v) => RawToken::Name(v.clone()),
        Value::Ref(v) => RawToken::Ref {
            num: v.num,
            gen: v.gen,
        },
        Value::Array(items) => RawToken::Array(items.iter().map(to_token).collect()),
        Value::Dict(entries) => RawToken::Dict(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_token(v)))
                .collect(),
        ),
        Value::Stream { dict, raw } => RawToken::Stream {
            dict: dict
                .iter()
                .map(|(k, v)| (k.clone(), to_token(v)))
                .collect(),
            data: Some(raw.clone()),
        },
    }
}
