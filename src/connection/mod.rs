//! Connection Handler Module
//!
//! This module manages individual client connections to FlashList.
//! Each client connection is handled by its own async task, and every task
//! shares the one [`ItemStore`](crate::storage::ItemStore).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TCP Listener                            │
//! │                    (main.rs)                                │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │
//!                        │ accept()
//!                        ▼
//!           ┌────────────────────────┐
//!           │   For each client...   │
//!           └────────────┬───────────┘
//!                        │
//!                        │ spawn task
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ConnectionHandler                           │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ Read frame  │───>│ Decode req  │───>│ Execute     │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      ┌─────────────┐        │
//! │                                      │ Send resp   │        │
//! │                                      └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Async I/O**: Uses Tokio for non-blocking network operations
//! - **Framing**: Length-delimited frames via `tokio_util::codec`
//! - **Error Isolation**: Bad requests get error responses; only transport
//!   failures close a connection
//! - **Statistics**: Tracks connection and request metrics
//!
//! ## Example
//!
//! ```ignore
//! use flashlist::connection::{handle_connection, ConnectionStats};
//! use flashlist::commands::CommandHandler;
//! use flashlist::storage::ItemStore;
//! use flashlist::protocol::MAX_FRAME_SIZE;
//! use std::sync::Arc;
//!
//! let store = Arc::new(ItemStore::new());
//! let stats = Arc::new(ConnectionStats::new());
//! let handler = CommandHandler::new(store);
//!
//! // For each accepted connection...
//! let (stream, addr) = listener.accept().await?;
//! tokio::spawn(handle_connection(stream, addr, handler, stats, MAX_FRAME_SIZE));
//! ```

pub mod handler;

// Re-export commonly used types
pub use handler::{handle_connection, ConnectionError, ConnectionHandler, ConnectionStats};
