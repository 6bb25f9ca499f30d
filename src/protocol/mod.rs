//! RESP Protocol Implementation
//!
//! The wire layer underneath the JSON commands: request serialization and
//! incremental reply parsing for RESP2.
//!
//! ## Modules
//!
//! - `types`: Defines the `RespValue` enum and serialization
//! - `parser`: Incremental parser for server replies
//!
//! ## Example
//!
//! ```
//! use flashjson::protocol::{parse_reply, RespValue};
//!
//! let request = RespValue::command(["JSON.OBJLEN", "obj", "."]);
//! let wire = request.serialize();
//! assert!(wire.starts_with(b"*3\r\n$11\r\nJSON.OBJLEN\r\n"));
//!
//! let (reply, _) = parse_reply(b":3\r\n").unwrap().unwrap();
//! assert_eq!(reply, RespValue::Integer(3));
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse_reply, ParseError, ParseResult, ReplyParser};
pub use types::RespValue;
