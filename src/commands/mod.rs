//! Command Handler Module
//!
//! This module implements the request processing layer for FlashList.
//! It receives decoded frames, executes them against the item store,
//! and returns appropriate responses.
//!
//! ## Architecture
//!
//! ```text
//! Client Frame
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  MessagePack    │  (protocol module)
//! │  Codec          │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Decode       │
//! │  - Dispatch     │
//! │  - Map result   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   ItemStore     │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Actions
//!
//! - `get_items`
//! - `add_item`, `remove_item`, `edit_item`

pub mod handler;

// Re-export the main command handler
pub use handler::CommandHandler;
