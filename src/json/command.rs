//! Command encoding.
//!
//! Each function here turns one logical operation into the positional
//! argument list the server expects. Keys, paths and JSON values are passed
//! through as opaque tokens; nothing is parsed or validated locally.

use crate::protocol::RespValue;
use bytes::Bytes;

use super::options::GetOptions;

/// The root path in the legacy path syntax.
pub const ROOT_PATH: &str = ".";

/// Command names.
pub mod names {
    pub const SET: &str = "JSON.SET";
    pub const GET: &str = "JSON.GET";
    pub const MGET: &str = "JSON.MGET";
    pub const DEL: &str = "JSON.DEL";
    pub const TYPE: &str = "JSON.TYPE";
    pub const NUMINCRBY: &str = "JSON.NUMINCRBY";
    pub const NUMMULTBY: &str = "JSON.NUMMULTBY";
    pub const STRLEN: &str = "JSON.STRLEN";
    pub const STRAPPEND: &str = "JSON.STRAPPEND";
    pub const ARRAPPEND: &str = "JSON.ARRAPPEND";
    pub const ARRINSERT: &str = "JSON.ARRINSERT";
    pub const ARRTRIM: &str = "JSON.ARRTRIM";
    pub const ARRPOP: &str = "JSON.ARRPOP";
    pub const ARRLEN: &str = "JSON.ARRLEN";
    pub const ARRINDEX: &str = "JSON.ARRINDEX";
    pub const OBJLEN: &str = "JSON.OBJLEN";
    pub const OBJKEYS: &str = "JSON.OBJKEYS";
    pub const CLEAR: &str = "JSON.CLEAR";
}

/// Conditional-write mode for `JSON.SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    /// Write regardless of what is there.
    #[default]
    Always,
    /// `NX`: only write if the path does not exist yet.
    IfAbsent,
    /// `XX`: only write if the path already exists.
    IfPresent,
}

impl SetMode {
    /// The literal appended after the value, if any.
    pub fn token(self) -> Option<&'static str> {
        match self {
            SetMode::Always => None,
            SetMode::IfAbsent => Some("NX"),
            SetMode::IfPresent => Some("XX"),
        }
    }
}

/// An encoded request: command name plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCommand {
    name: &'static str,
    args: Vec<Bytes>,
}

impl JsonCommand {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::with_capacity(4),
        }
    }

    pub fn arg(mut self, token: impl AsRef<[u8]>) -> Self {
        self.args.push(Bytes::copy_from_slice(token.as_ref()));
        self
    }

    pub fn opt_arg(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.arg(token),
            None => self,
        }
    }

    pub fn args<I, A>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        tokens.into_iter().fold(self, |cmd, token| cmd.arg(token))
    }

    /// Appends an integer in plain decimal.
    pub fn int_arg(self, n: i64) -> Self {
        let mut buf = itoa::Buffer::new();
        self.arg(buf.format(n))
    }

    /// Appends a float in shortest round-trip form. The output never
    /// depends on locale, so `1.5` is always `1.5`, never `1,5`.
    pub fn float_arg(self, n: f64) -> Self {
        let mut buf = ryu::Buffer::new();
        self.arg(buf.format(n))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Arguments after the command name.
    pub fn arguments(&self) -> &[Bytes] {
        &self.args
    }

    /// Converts to the RESP array sent on the wire.
    pub fn into_resp(self) -> RespValue {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(RespValue::BulkString(Bytes::from_static(self.name.as_bytes())));
        tokens.extend(self.args.into_iter().map(RespValue::BulkString));
        RespValue::Array(tokens)
    }
}

/// `JSON.SET <key> <path> <value> [NX|XX]`
pub fn set(key: &str, path: &str, value: &str, mode: SetMode) -> JsonCommand {
    JsonCommand::new(names::SET)
        .arg(key)
        .arg(path)
        .arg(value)
        .opt_arg(mode.token())
}

/// `JSON.GET <key> [INDENT i] [NEWLINE n] [SPACE s] [NOESCAPE] [<path> ...]`
pub fn get(key: &str, options: &GetOptions, paths: &[&str]) -> JsonCommand {
    JsonCommand::new(names::GET)
        .arg(key)
        .args(options.to_args())
        .args(paths)
}

/// `JSON.MGET <key> ... <path>`
///
/// The server takes the path last. Callers pass it first, matching the
/// logical "one path, many keys" reading.
pub fn mget(path: &str, keys: &[&str]) -> JsonCommand {
    JsonCommand::new(names::MGET).args(keys).arg(path)
}

/// `JSON.DEL <key> [<path>]`
pub fn del(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::DEL).arg(key).opt_arg(path)
}

/// `JSON.TYPE <key> [<path>]`
pub fn type_of(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::TYPE).arg(key).opt_arg(path)
}

/// `JSON.NUMINCRBY <key> <path> <number>`
pub fn num_incr_by(key: &str, path: &str, increment: f64) -> JsonCommand {
    JsonCommand::new(names::NUMINCRBY)
        .arg(key)
        .arg(path)
        .float_arg(increment)
}

/// `JSON.NUMMULTBY <key> <path> <number>`
pub fn num_mult_by(key: &str, path: &str, factor: f64) -> JsonCommand {
    JsonCommand::new(names::NUMMULTBY)
        .arg(key)
        .arg(path)
        .float_arg(factor)
}

/// `JSON.STRLEN <key> [<path>]`
pub fn str_len(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::STRLEN).arg(key).opt_arg(path)
}

/// `JSON.STRAPPEND <key> [<path>] <json-string>`
pub fn str_append(key: &str, path: Option<&str>, value: &str) -> JsonCommand {
    JsonCommand::new(names::STRAPPEND)
        .arg(key)
        .opt_arg(path)
        .arg(value)
}

/// `JSON.ARRAPPEND <key> <path> <value> ...`
pub fn arr_append(key: &str, path: &str, values: &[&str]) -> JsonCommand {
    JsonCommand::new(names::ARRAPPEND)
        .arg(key)
        .arg(path)
        .args(values)
}

/// `JSON.ARRINSERT <key> <path> <index> <value> ...`
pub fn arr_insert(key: &str, path: &str, index: i64, values: &[&str]) -> JsonCommand {
    JsonCommand::new(names::ARRINSERT)
        .arg(key)
        .arg(path)
        .int_arg(index)
        .args(values)
}

/// `JSON.ARRTRIM <key> <path> <start> <stop>`
pub fn arr_trim(key: &str, path: &str, start: i64, stop: i64) -> JsonCommand {
    JsonCommand::new(names::ARRTRIM)
        .arg(key)
        .arg(path)
        .int_arg(start)
        .int_arg(stop)
}

/// `JSON.ARRPOP <key> [<path> [<index>]]`
///
/// An index without a path pops from the root array.
pub fn arr_pop(key: &str, path: Option<&str>, index: Option<i64>) -> JsonCommand {
    let cmd = JsonCommand::new(names::ARRPOP).arg(key);
    match index {
        Some(index) => cmd.arg(path.unwrap_or(ROOT_PATH)).int_arg(index),
        None => cmd.opt_arg(path),
    }
}

/// `JSON.ARRLEN <key> [<path>]`
pub fn arr_len(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::ARRLEN).arg(key).opt_arg(path)
}

/// `JSON.ARRINDEX <key> <path> <json-scalar> [<start> [<stop>]]`
///
/// A stop without a start searches from index 0.
pub fn arr_index(
    key: &str,
    path: &str,
    value: &str,
    start: Option<i64>,
    stop: Option<i64>,
) -> JsonCommand {
    let cmd = JsonCommand::new(names::ARRINDEX)
        .arg(key)
        .arg(path)
        .arg(value);
    match (start, stop) {
        (None, None) => cmd,
        (Some(start), None) => cmd.int_arg(start),
        (start, Some(stop)) => cmd.int_arg(start.unwrap_or(0)).int_arg(stop),
    }
}

/// `JSON.OBJLEN <key> [<path>]`
pub fn obj_len(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::OBJLEN).arg(key).opt_arg(path)
}

/// `JSON.OBJKEYS <key> [<path>]`
pub fn obj_keys(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::OBJKEYS).arg(key).opt_arg(path)
}

/// `JSON.CLEAR <key> [<path>]`
pub fn clear(key: &str, path: Option<&str>) -> JsonCommand {
    JsonCommand::new(names::CLEAR).arg(key).opt_arg(path)
}
