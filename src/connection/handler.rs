//! Connection Handler Module
//!
//! This module handles individual client connections to FlashList.
//! Each client gets its own handler task that runs in a loop,
//! reading frames and sending responses.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned                     Open
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Await next frame        │ │             Receiving
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Decode + execute        │ │             Dispatching
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Encode + send response  │ │             Responding
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. Client disconnects / transport error          Closed
//!        │
//!        ▼
//! 5. Handler task ends, transport dropped
//! ```
//!
//! ## Framing
//!
//! Frames are length-delimited (4-byte big-endian prefix). The codec buffers
//! partial reads, so the loop only ever sees whole payloads. Bad payloads are
//! answered with an error response. Only transport failures end the loop.
//!
//! The read and write halves use separate codecs: inbound requests are capped
//! at `max_frame_size`, while a `get_items` response may be as large as the
//! list it carries.

use crate::commands::CommandHandler;
use crate::protocol::{
    encode_response, frame_codec, ProtocolError, Response, MAX_FRAME_SIZE, MAX_RESPONSE_SIZE,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};
use tracing::{debug, info, trace, warn};

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total requests processed
    pub requests_processed: AtomicU64,
    /// Requests answered with an error response
    pub error_responses: AtomicU64,
    /// Total payload bytes read
    pub bytes_read: AtomicU64,
    /// Total payload bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn request_processed(&self, response: &Response) {
        self.requests_processed.fetch_add(1, Ordering::Relaxed);
        if response.is_error() {
            self.error_responses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written.fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Counts one running connection; the count drops with it, even if the
/// task is cancelled mid-loop.
struct ActiveConnection(Arc<ConnectionStats>);

impl ActiveConnection {
    fn open(stats: Arc<ConnectionStats>) -> Self {
        stats.connection_opened();
        Self(stats)
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.0.connection_closed();
    }
}

/// Handles a single client connection.
///
/// Generic over the transport so the same loop runs on a `TcpStream` in
/// production and an in-memory duplex pipe in tests.
pub struct ConnectionHandler<T> {
    /// Inbound frames, capped at the configured request size
    reader: FramedRead<ReadHalf<T>, LengthDelimitedCodec>,

    /// Outbound frames, limited only by the length prefix
    writer: FramedWrite<WriteHalf<T>, LengthDelimitedCodec>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// The command handler (shares the store with every other connection)
    command_handler: CommandHandler,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<T> ConnectionHandler<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler with the default frame size limit.
    ///
    /// # Arguments
    ///
    /// * `stream` - The transport for this connection
    /// * `addr` - The client's socket address
    /// * `command_handler` - The command handler for executing requests
    /// * `stats` - Shared connection statistics
    pub fn new(
        stream: T,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        Self::with_max_frame_size(stream, addr, command_handler, stats, MAX_FRAME_SIZE)
    }

    /// Creates a new connection handler that rejects frames above `max_frame_size`.
    pub fn with_max_frame_size(
        stream: T,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
        max_frame_size: usize,
    ) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);

        Self {
            reader: FramedRead::new(read_half, frame_codec(max_frame_size)),
            writer: FramedWrite::new(write_half, frame_codec(MAX_RESPONSE_SIZE)),
            addr,
            command_handler,
            stats,
        }
    }

    /// Runs the main connection loop.
    ///
    /// This method reads requests from the client, executes them, and sends
    /// back responses until the client disconnects or the transport fails.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        let _active = ActiveConnection::open(Arc::clone(&self.stats));
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected"),
            Err(ConnectionError::Io(io_err))
                if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
            {
                debug!(client = %self.addr, "Connection reset by client")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
        }

        result
    }

    /// The receive-dispatch-respond loop.
    ///
    /// Exactly one response is sent per frame, before the next frame is read,
    /// so responses leave in request order.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        while let Some(frame) = self.reader.next().await {
            let frame = frame?;
            self.stats.bytes_read(frame.len());
            trace!(client = %self.addr, bytes = frame.len(), "Received frame");

            let response = self.command_handler.execute(&frame);
            self.stats.request_processed(&response);
            debug!(client = %self.addr, response = %response, "Request handled");

            self.send_response(&response).await?;
        }

        Ok(())
    }

    /// Sends a response to the client.
    async fn send_response(&mut self, response: &Response) -> Result<(), ConnectionError> {
        let bytes = match encode_response(response) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(client = %self.addr, error = %e, "Failed to encode response");
                encode_response(&Response::error(e.to_string()))?
            }
        };

        let len = bytes.len();
        self.writer.send(bytes).await?;
        self.stats.bytes_written(len);
        trace!(client = %self.addr, bytes = len, "Sent response");

        Ok(())
    }
}

/// Errors that end a connection.
///
/// Application errors (bad item, unknown action, malformed payload) never
/// show up here; they are answered in-band.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue, oversized frame)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded at all
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Handles a client connection.
///
/// This is a convenience function that creates a ConnectionHandler
/// and runs it to completion.
///
/// # Arguments
///
/// * `stream` - The transport for this connection
/// * `addr` - The client's socket address
/// * `command_handler` - The command handler for executing requests
/// * `stats` - Shared connection statistics
/// * `max_frame_size` - Largest frame payload accepted from the client
pub async fn handle_connection<T>(
    stream: T,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
    max_frame_size: usize,
) where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let handler =
        ConnectionHandler::with_max_frame_size(stream, addr, command_handler, stats, max_frame_size);
    if let Err(e) = handler.run().await {
        debug!(client = %addr, error = %e, "Connection ended with error");
    }
}
