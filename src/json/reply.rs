//! Reply decoding.
//!
//! The caller always says which [`Shape`] it expects; the decoder never
//! guesses from whatever arrived. JSON payloads stay opaque text.
//!
//! An error reply becomes [`JsonError::Server`] for every shape. Anything
//! else that does not fit the expected shape becomes
//! [`JsonError::ProtocolMismatch`].

use crate::error::{JsonError, JsonResult};
use crate::protocol::RespValue;
use bytes::Bytes;
use std::fmt;

use super::command::names;

/// Expected reply structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A string, or nil meaning "absent".
    NilableString,
    /// A string that is never nil.
    String,
    Integer,
    StringList,
    /// One nilable string per requested key, in request order.
    KeyValueList,
}

impl Shape {
    /// The reply shape of a command, by name (case-insensitive).
    pub fn for_command(name: &str) -> Option<Shape> {
        let shape = match name.to_ascii_uppercase().as_str() {
            names::SET | names::GET | names::TYPE | names::ARRPOP => Shape::NilableString,
            names::NUMINCRBY | names::NUMMULTBY => Shape::String,
            names::DEL
            | names::STRLEN
            | names::STRAPPEND
            | names::ARRAPPEND
            | names::ARRINSERT
            | names::ARRTRIM
            | names::ARRLEN
            | names::ARRINDEX
            | names::OBJLEN
            | names::CLEAR => Shape::Integer,
            names::OBJKEYS => Shape::StringList,
            names::MGET => Shape::KeyValueList,
            _ => return None,
        };
        Some(shape)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::NilableString => "string or nil",
            Shape::String => "string",
            Shape::Integer => "integer",
            Shape::StringList => "array of strings",
            Shape::KeyValueList => "array of strings or nils",
        };
        f.write_str(s)
    }
}

/// One entry of a multi-key read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    /// `None` when the key (or the path within it) does not exist.
    pub value: Option<String>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

/// A decoded reply, tagged by the shape that was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    NilableString(Option<String>),
    String(String),
    Integer(i64),
    StringList(Vec<String>),
    KeyValueList(Vec<KeyValue>),
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::NilableString(None) => write!(f, "(nil)"),
            Decoded::NilableString(Some(s)) | Decoded::String(s) => write!(f, "{}", s),
            Decoded::Integer(n) => write!(f, "(integer) {}", n),
            Decoded::StringList(items) if items.is_empty() => write!(f, "(empty array)"),
            Decoded::StringList(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            Decoded::KeyValueList(entries) if entries.is_empty() => write!(f, "(empty array)"),
            Decoded::KeyValueList(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    match &entry.value {
                        Some(v) => write!(f, "{}) {} => {}", i + 1, entry.key, v)?,
                        None => write!(f, "{}) {} => (nil)", i + 1, entry.key)?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Decodes `reply` as `shape`. `keys` is only used for
/// [`Shape::KeyValueList`], where it must be the keys from the request.
pub fn decode(shape: Shape, reply: RespValue, keys: &[&str]) -> JsonResult<Decoded> {
    Ok(match shape {
        Shape::NilableString => Decoded::NilableString(nilable_string(reply)?),
        Shape::String => Decoded::String(string(reply)?),
        Shape::Integer => Decoded::Integer(integer(reply)?),
        Shape::StringList => Decoded::StringList(string_list(reply)?),
        Shape::KeyValueList => Decoded::KeyValueList(key_values(keys, reply)?),
    })
}

pub fn nilable_string(reply: RespValue) -> JsonResult<Option<String>> {
    match reply {
        RespValue::Null => Ok(None),
        RespValue::SimpleString(s) => Ok(Some(s)),
        RespValue::BulkString(b) => utf8(b, Shape::NilableString).map(Some),
        other => Err(unexpected(Shape::NilableString, other)),
    }
}

pub fn string(reply: RespValue) -> JsonResult<String> {
    match reply {
        RespValue::SimpleString(s) => Ok(s),
        RespValue::BulkString(b) => utf8(b, Shape::String),
        other => Err(unexpected(Shape::String, other)),
    }
}

pub fn integer(reply: RespValue) -> JsonResult<i64> {
    match reply {
        RespValue::Integer(n) => Ok(n),
        other => Err(unexpected(Shape::Integer, other)),
    }
}

pub fn string_list(reply: RespValue) -> JsonResult<Vec<String>> {
    let items = match reply {
        RespValue::Array(items) => items,
        other => return Err(unexpected(Shape::StringList, other)),
    };

    items
        .into_iter()
        .map(|item| match item {
            RespValue::SimpleString(s) => Ok(s),
            RespValue::BulkString(b) => utf8(b, Shape::StringList),
            other => Err(JsonError::mismatch(
                Shape::StringList,
                format!("array containing {}", other.kind()),
            )),
        })
        .collect()
}

/// Pairs each requested key with its entry in the reply.
///
/// The server answers positionally and the transport preserves order, so
/// entry `i` belongs to `keys[i]`. The entries are not re-sorted.
pub fn key_values(keys: &[&str], reply: RespValue) -> JsonResult<Vec<KeyValue>> {
    let items = match reply {
        RespValue::Array(items) => items,
        other => return Err(unexpected(Shape::KeyValueList, other)),
    };

    if items.len() != keys.len() {
        return Err(JsonError::mismatch(
            Shape::KeyValueList,
            format!("array of {} entries for {} keys", items.len(), keys.len()),
        ));
    }

    keys.iter()
        .zip(items)
        .map(|(key, item)| {
            let value = match item {
                RespValue::Null => None,
                RespValue::SimpleString(s) => Some(s),
                RespValue::BulkString(b) => Some(utf8(b, Shape::KeyValueList)?),
                other => {
                    return Err(JsonError::mismatch(
                        Shape::KeyValueList,
                        format!("array containing {}", other.kind()),
                    ))
                }
            };
            Ok(KeyValue::new(*key, value))
        })
        .collect()
}

/// Error replies are server errors whatever shape was expected.
fn unexpected(expected: Shape, reply: RespValue) -> JsonError {
    match reply {
        RespValue::Error(msg) => JsonError::Server(msg),
        other => JsonError::mismatch(expected, other.kind()),
    }
}

fn utf8(bytes: Bytes, shape: Shape) -> JsonResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| JsonError::mismatch(shape, "bulk string with invalid UTF-8"))
}
