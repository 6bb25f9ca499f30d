//! A single client connection to the server.
//!
//! ## Request Lifecycle
//!
//! ```text
//! 1. Serialize the command into a RESP array
//!        │
//!        ▼
//! 2. Write + flush through the BufWriter
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │  Read loop                   │
//!    │                              │
//!    │  try to parse one reply ─────┼──> complete: split it off the buffer
//!    │        │ incomplete          │
//!    │        ▼                     │
//!    │  read more bytes from socket │
//!    │        │                     │
//!    │   [loop back]                │
//!    └──────────────────────────────┘
//! ```
//!
//! Exactly one request is in flight at a time, so replies match requests by
//! order alone. If an exchange fails halfway (timeout, I/O error, garbage on
//! the wire, bytes left over after the reply) the stream position is unknown
//! and the connection is marked broken; every later request fails fast with [`ConnectionError::Broken`].

use crate::connection::{ConnectionConfig, Transport};
use crate::protocol::{ParseError, ReplyParser, RespValue};
use async_trait::async_trait;
use bytes::BytesMut;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Upper bound on buffered reply bytes (1 GiB)
const MAX_BUFFER_SIZE: usize = 1024 * 1024 * 1024;

const INITIAL_BUFFER_SIZE: usize = 4096;

/// Counters that can be shared across connections.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    pub connections_opened: AtomicU64,
    pub commands_sent: AtomicU64,
    pub replies_received: AtomicU64,
    pub bytes_read: AtomicU64,
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_sent(&self, bytes: usize) {
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn reply_received(&self) {
        self.replies_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Errors raised by the transport.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The server sent bytes that are not valid RESP
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// The server closed the connection before a reply started
    #[error("Server closed the connection")]
    Disconnected,

    /// The server closed the connection partway through a reply
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Reply exceeds {0} bytes")]
    ReplyTooLarge(usize),

    /// Bytes arrived that belong to no outstanding request
    #[error("{0} unsolicited bytes after reply")]
    UnsolicitedData(usize),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// An earlier exchange failed partway and the stream is out of sync
    #[error("Connection is broken by an earlier failure")]
    Broken,
}

/// One connection, generic over the byte stream so tests can substitute an
/// in-memory mock for the TCP socket.
pub struct Connection<S = TcpStream> {
    stream: BufWriter<S>,

    /// Peer description (for logging)
    peer: String,

    buffer: BytesMut,
    parser: ReplyParser,
    response_timeout: Option<Duration>,
    broken: bool,
    stats: Arc<ConnectionStats>,
}

impl Connection<TcpStream> {
    /// Opens a TCP connection with fresh statistics.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
        Self::connect_with_stats(config, Arc::new(ConnectionStats::new())).await
    }

    /// Opens a TCP connection that reports into shared statistics.
    pub async fn connect_with_stats(
        config: &ConnectionConfig,
        stats: Arc<ConnectionStats>,
    ) -> Result<Self, ConnectionError> {
        let address = config.address();
        let connecting = TcpStream::connect((config.host.as_str(), config.port));

        let stream = match config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connecting)
                .await
                .map_err(|_| ConnectionError::Timeout(limit))??,
            None => connecting.await?,
        };
        stream.set_nodelay(true)?;

        info!(server = %address, "Connected");
        Ok(Self::from_stream(stream, address, stats).with_response_timeout(config.response_timeout))
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wraps an already established stream.
    pub fn from_stream(stream: S, peer: impl Into<String>, stats: Arc<ConnectionStats>) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            peer: peer.into(),
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            parser: ReplyParser::new(),
            response_timeout: None,
            broken: false,
            stats,
        }
    }

    pub fn with_response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn stats(&self) -> &Arc<ConnectionStats> {
        &self.stats
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Sends one command and waits for its reply, honoring the response
    /// timeout.
    pub async fn execute(&mut self, command: &RespValue) -> Result<RespValue, ConnectionError> {
        if self.broken {
            return Err(ConnectionError::Broken);
        }

        let result = match self.response_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.exchange(command)).await {
                Ok(result) => result,
                Err(_) => Err(ConnectionError::Timeout(limit)),
            },
            None => self.exchange(command).await,
        };

        if let Err(e) = &result {
            warn!(server = %self.peer, error = %e, "Request failed, connection unusable");
            self.broken = true;
        }
        result
    }

    async fn exchange(&mut self, command: &RespValue) -> Result<RespValue, ConnectionError> {
        self.send(command).await?;
        self.read_reply().await
    }

    async fn send(&mut self, command: &RespValue) -> Result<(), ConnectionError> {
        let bytes = command.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.command_sent(bytes.len());
        trace!(server = %self.peer, bytes = bytes.len(), "Sent command");
        Ok(())
    }

    async fn read_reply(&mut self) -> Result<RespValue, ConnectionError> {
        loop {
            if let Some(reply) = self.try_parse_reply()? {
                self.stats.reply_received();
                return Ok(reply);
            }
            self.read_more_data().await?;
        }
    }

    fn try_parse_reply(&mut self) -> Result<Option<RespValue>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer)? {
            Some((value, consumed)) => {
                let _ = self.buffer.split_to(consumed);
                if !self.buffer.is_empty() {
                    return Err(ConnectionError::UnsolicitedData(self.buffer.len()));
                }
                trace!(server = %self.peer, consumed, "Parsed reply");
                Ok(Some(value))
            }
            None => {
                trace!(
                    server = %self.peer,
                    buffered = self.buffer.len(),
                    "Incomplete reply, need more data"
                );
                Ok(None)
            }
        }
    }

    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            return Err(ConnectionError::ReplyTooLarge(MAX_BUFFER_SIZE));
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;
        if n == 0 {
            return if self.buffer.is_empty() {
                debug!(server = %self.peer, "Server closed the connection");
                Err(ConnectionError::Disconnected)
            } else {
                Err(ConnectionError::UnexpectedEof)
            };
        }

        self.stats.bytes_read(n);
        trace!(server = %self.peer, bytes = n, "Read data");
        Ok(())
    }
}

#[async_trait]
impl<S> Transport for Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn request(&mut self, command: RespValue) -> Result<RespValue, ConnectionError> {
        self.execute(&command).await
    }
}
