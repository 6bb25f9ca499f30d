//! JSON Command Layer
//!
//! Client side of the Redis JSON command family. The server owns the
//! documents, path evaluation and mutation; this module only builds
//! requests and interprets replies.
//!
//! ## Architecture
//!
//! ```text
//!  caller
//!    │  json.arrinsert("arr", ".", 0, &["-2", "-1"])
//!    ▼
//! ┌─────────────┐   JsonCommand   ┌─────────────┐
//! │ JsonClient  │ ──────────────> │  command    │  ordered tokens
//! │  (client)   │ <────────────── │  + options  │
//! └──────┬──────┘                 └─────────────┘
//!        │ RespValue
//!        ▼
//!    Transport (connection module)
//!        │ RespValue
//!        ▼
//! ┌─────────────┐
//! │   reply     │  decode with the command's Shape
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - `command`: per-command argument encoding and [`SetMode`]
//! - `options`: [`GetOptions`] formatting flags
//! - `reply`: [`Shape`] tags and decoders
//! - `client`: the [`JsonClient`] facade

pub mod client;
pub mod command;
pub mod options;
pub mod reply;

pub use client::JsonClient;
pub use command::{JsonCommand, SetMode, ROOT_PATH};
pub use options::{GetOptions, GetOptionsBuilder};
pub use reply::{Decoded, KeyValue, Shape};
