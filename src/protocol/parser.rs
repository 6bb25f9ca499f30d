//! Incremental RESP Reply Parser
//!
//! Replies arrive over TCP in arbitrary chunks, so the parser never assumes
//! a whole reply is in the buffer. Each call returns one of:
//! - `Ok(Some((value, consumed)))` - a complete reply, `consumed` bytes used
//! - `Ok(None)` - the reply is incomplete, read more and retry
//! - `Err(ParseError)` - the server sent something that is not RESP
//!
//! The connection keeps the unconsumed tail of its buffer between reads and
//! calls `parse()` again after each read.

use crate::protocol::types::{prefix, RespValue, CRLF};
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during RESP parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unknown type prefix: {0:#04x}")]
    UnknownPrefix(u8),

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Bulk string length is negative (but not -1 for null)
    #[error("invalid bulk string length: {0}")]
    InvalidBulkLength(i64),

    /// Array length is negative (but not -1 for null)
    #[error("invalid array length: {0}")]
    InvalidArrayLength(i64),

    /// Protocol violation (missing CRLF, etc.)
    #[error("protocol error: {0}")]
    ProtocolError(String),

    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

type Parsed = ParseResult<Option<(RespValue, usize)>>;

/// Parser for server replies.
///
/// # Example
///
/// ```
/// use flashjson::protocol::{ReplyParser, RespValue};
///
/// let mut parser = ReplyParser::new();
/// let (value, consumed) = parser.parse(b":3\r\n").unwrap().unwrap();
/// assert_eq!(value, RespValue::Integer(3));
/// assert_eq!(consumed, 4);
/// ```
#[derive(Debug, Default)]
pub struct ReplyParser {
    depth: usize,
}

impl ReplyParser {
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Attempts to parse one reply from the front of `buf`.
    pub fn parse(&mut self, buf: &[u8]) -> Parsed {
        self.depth = 0;
        self.parse_value(buf)
    }

    fn parse_value(&mut self, buf: &[u8]) -> Parsed {
        let Some(&first) = buf.first() else {
            return Ok(None);
        };

        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::ProtocolError(format!(
                "maximum nesting depth exceeded: {}",
                MAX_NESTING_DEPTH
            )));
        }

        match first {
            prefix::SIMPLE_STRING => {
                Ok(read_line(buf)?.map(|(line, n)| (RespValue::SimpleString(line.to_string()), n)))
            }
            prefix::ERROR => {
                Ok(read_line(buf)?.map(|(line, n)| (RespValue::Error(line.to_string()), n)))
            }
            prefix::INTEGER => match read_line(buf)? {
                Some((line, n)) => Ok(Some((RespValue::Integer(parse_int(line)?), n))),
                None => Ok(None),
            },
            prefix::BULK_STRING => self.parse_bulk_string(buf),
            prefix::ARRAY => self.parse_array(buf),
            other => Err(ParseError::UnknownPrefix(other)),
        }
    }

    /// `$<length>\r\n<data>\r\n`, or `$-1\r\n` for nil.
    fn parse_bulk_string(&mut self, buf: &[u8]) -> Parsed {
        let (length, header) = match read_line(buf)? {
            Some((line, n)) => (parse_int(line)?, n),
            None => return Ok(None),
        };

        if length == -1 {
            return Ok(Some((RespValue::Null, header)));
        }
        if length < 0 {
            return Err(ParseError::InvalidBulkLength(length));
        }

        let length = length as usize;
        if length > MAX_BULK_SIZE {
            return Err(ParseError::MessageTooLarge {
                size: length,
                max: MAX_BULK_SIZE,
            });
        }

        let total = header + length + CRLF.len();
        if buf.len() < total {
            return Ok(None);
        }
        if &buf[header + length..total] != CRLF {
            return Err(ParseError::ProtocolError(
                "bulk string missing trailing CRLF".to_string(),
            ));
        }

        let data = Bytes::copy_from_slice(&buf[header..header + length]);
        Ok(Some((RespValue::BulkString(data), total)))
    }

    /// `*<count>\r\n<elements...>`, or `*-1\r\n` for nil.
    fn parse_array(&mut self, buf: &[u8]) -> Parsed {
        let (count, mut consumed) = match read_line(buf)? {
            Some((line, n)) => (parse_int(line)?, n),
            None => return Ok(None),
        };

        if count == -1 {
            return Ok(Some((RespValue::Null, consumed)));
        }
        if count < 0 {
            return Err(ParseError::InvalidArrayLength(count));
        }

        // The count comes off the wire; cap the preallocation.
        let mut elements = Vec::with_capacity((count as usize).min(1024));

        self.depth += 1;
        for _ in 0..count {
            match self.parse_value(&buf[consumed..])? {
                Some((value, used)) => {
                    elements.push(value);
                    consumed += used;
                }
                None => return Ok(None),
            }
        }
        self.depth -= 1;

        Ok(Some((RespValue::Array(elements), consumed)))
    }
}

/// Reads the line after the type prefix. Returns the line content and the
/// number of bytes used including prefix and CRLF.
fn read_line(buf: &[u8]) -> ParseResult<Option<(&str, usize)>> {
    match find_crlf(&buf[1..]) {
        Some(pos) => {
            let line = std::str::from_utf8(&buf[1..1 + pos])
                .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;
            Ok(Some((line, 1 + pos + CRLF.len())))
        }
        None => Ok(None),
    }
}

fn parse_int(s: &str) -> ParseResult<i64> {
    s.parse()
        .map_err(|e: std::num::ParseIntError| ParseError::InvalidInteger(format!("{s:?}: {e}")))
}

#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

/// Parses a single reply with a fresh parser.
pub fn parse_reply(buf: &[u8]) -> Parsed {
    ReplyParser::new().parse(buf)
}
