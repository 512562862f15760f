//! # FlashList - A Shared, Network-Accessible Mutable List
//!
//! FlashList serves one in-memory list of strings to any number of clients.
//! Clients send MessagePack requests over length-delimited TCP frames to read,
//! append, remove, or rename entries, and get one acknowledgment per request.
//!
//! ## Features
//!
//! - **One Shared List**: Every connection reads and mutates the same sequence
//! - **Atomic Operations**: Each operation is a single critical section
//! - **Error Isolation**: Bad requests are answered in-band and never close a connection
//! - **Async I/O**: Built on Tokio, one task per connection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              FlashList                                  │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │                     ┌─────────────┐    ┌──────────────────────────────┐ │
//! │                     │ Length-     │    │          ItemStore           │ │
//! │                     │ delimited + │    │   RwLock<Vec<String>>        │ │
//! │                     │ MessagePack │    │   first-match remove / edit  │ │
//! │                     └─────────────┘    └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use flashlist::connection::ConnectionStats;
//! use flashlist::protocol::MAX_FRAME_SIZE;
//! use flashlist::server::accept_loop;
//! use flashlist::storage::ItemStore;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(ItemStore::new());
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("127.0.0.1:8765").await.unwrap();
//!     accept_loop(listener, store, stats, MAX_FRAME_SIZE).await;
//! }
//! ```
//!
//! ## Supported Actions
//!
//! - `get_items` → `{status: "success", data: [...]}`
//! - `add_item {item}` → `Item '<item>' added.`
//! - `remove_item {item}` → `Item '<item>' removed.`
//! - `edit_item {old_item, new_item}` → `Item '<old>' updated to '<new>'.`
//!
//! ## Module Overview
//!
//! - [`protocol`]: Request/response types and the MessagePack codec
//! - [`storage`]: The shared item store
//! - [`commands`]: Request dispatch
//! - [`connection`]: Client connection management
//! - [`server`]: Accept loop
//! - [`client`]: Async client for the same protocol
//! - [`config`]: Server configuration

pub mod client;
pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use client::{ClientError, ListClient};
pub use commands::CommandHandler;
pub use config::ServerConfig;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{ProtocolError, Request, Response, Status};
pub use storage::{ItemStore, StoreError};

/// The default port FlashList listens on
pub const DEFAULT_PORT: u16 = 8765;

/// The default host FlashList binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of FlashList
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
