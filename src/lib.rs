//! # FlashJSON - An Async Client for Redis JSON Commands
//!
//! FlashJSON talks to a Redis server with the JSON module loaded. It builds
//! `JSON.*` requests, sends them over RESP, and turns the replies into typed
//! results. Documents, paths and values are opaque strings on this side:
//! the server parses and evaluates them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            FlashJSON                                │
//! │                                                                     │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────────────┐  │
//! │  │ JsonClient  │───>│  Command    │───>│  Transport              │  │
//! │  │  (facade)   │    │  Encoder    │    │  └─ Connection (TCP)    │  │
//! │  └──────▲──────┘    └─────────────┘    └────────────┬────────────┘  │
//! │         │                                           │               │
//! │         │           ┌─────────────┐    ┌────────────▼────────────┐  │
//! │         └───────────│   Reply     │<───│  RESP ReplyParser       │  │
//! │                     │   Decoder   │    │                         │  │
//! │                     └─────────────┘    └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use flashjson::{Connection, ConnectionConfig, GetOptions, JsonClient, SetMode};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let conn = Connection::connect(&ConnectionConfig::default()).await?;
//!     let mut json = JsonClient::new(conn);
//!
//!     json.set("arr", ".", "[]", SetMode::Always).await?;
//!     assert_eq!(json.arrappend("arr", ".", &["0"]).await?, 1);
//!     assert_eq!(json.arrinsert("arr", ".", 0, &["-2", "-1"]).await?, 3);
//!     assert_eq!(json.get("arr").await?.as_deref(), Some("[-2,-1,0]"));
//!
//!     let pretty = GetOptions::builder().indent("  ").newline("\n").build();
//!     println!("{:?}", json.get_with("arr", &pretty, &[]).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - `JSON.SET key path value [NX|XX]`
//! - `JSON.GET key [INDENT i] [NEWLINE n] [SPACE s] [NOESCAPE] [path ...]`
//! - `JSON.MGET key [key ...] path`
//! - `JSON.DEL` / `JSON.TYPE` / `JSON.CLEAR key [path]`
//! - `JSON.NUMINCRBY` / `JSON.NUMMULTBY key path number`
//! - `JSON.STRLEN key [path]` / `JSON.STRAPPEND key [path] json-string`
//! - `JSON.ARRAPPEND`, `JSON.ARRINSERT`, `JSON.ARRTRIM`, `JSON.ARRPOP`,
//!   `JSON.ARRLEN`, `JSON.ARRINDEX`
//! - `JSON.OBJLEN` / `JSON.OBJKEYS key [path]`
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP value type, serialization and reply parser
//! - [`connection`]: the [`Transport`] trait and the TCP [`Connection`]
//! - [`json`]: command encoding, formatting options, reply decoding, facade
//! - [`error`]: the error taxonomy shared by all JSON calls
//!
//! ## Errors
//!
//! Every call returns [`JsonResult`]. A nil reply where a command defines
//! absence comes back as `Ok(None)`; server error replies, transport
//! failures and malformed replies are distinct [`JsonError`] variants.

pub mod connection;
pub mod error;
pub mod json;
pub mod protocol;

pub use connection::{Connection, ConnectionConfig, ConnectionError, ConnectionStats, Transport};
pub use error::{JsonError, JsonResult};
pub use json::{Decoded, GetOptions, JsonClient, KeyValue, SetMode, Shape, ROOT_PATH};
pub use protocol::{ParseError, ReplyParser, RespValue};

/// The default Redis port
pub const DEFAULT_PORT: u16 = 6379;

/// The default host to connect to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of FlashJSON
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
