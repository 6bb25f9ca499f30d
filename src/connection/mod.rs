//! Connection Module
//!
//! The transport underneath the JSON commands. The command layer only sees
//! the [`Transport`] trait: hand it a request, get back one reply.
//!
//! ```text
//! ┌─────────────┐   RespValue    ┌──────────────────────────────┐
//! │ JsonClient  │ ─────────────> │ Transport                    │
//! │             │ <───────────── │  └─ Connection (TCP, BytesMut │
//! └─────────────┘   RespValue    │     buffer, ReplyParser)      │
//!                                └──────────────────────────────┘
//! ```
//!
//! Pooling, reconnects and retries are left to whoever owns the transport.
//!
//! ## Example
//!
//! ```ignore
//! use flashjson::connection::{Connection, ConnectionConfig};
//!
//! let mut conn = Connection::connect(&ConnectionConfig::default()).await?;
//! ```

pub mod config;
pub mod tcp;

pub use config::ConnectionConfig;
pub use tcp::{Connection, ConnectionError, ConnectionStats};

use crate::protocol::RespValue;
use async_trait::async_trait;

/// One request/reply round trip.
///
/// Implementations must return replies in request order. The JSON layer
/// relies on that and does not re-check it.
#[async_trait]
pub trait Transport: Send {
    async fn request(&mut self, command: RespValue) -> Result<RespValue, ConnectionError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &mut T {
    async fn request(&mut self, command: RespValue) -> Result<RespValue, ConnectionError> {
        (**self).request(command).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn request(&mut self, command: RespValue) -> Result<RespValue, ConnectionError> {
        (**self).request(command).await
    }
}
