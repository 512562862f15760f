//! Storage Module
//!
//! This module provides the shared item list for FlashList: one ordered
//! sequence of strings behind a single lock, with four atomic operations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ItemStore                             │
//! │   ┌─────────────────────────────────────────────────────┐   │
//! │   │  RwLock<Vec<String>>   ["milk", "eggs", "bread"]     │   │
//! │   └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!        ▲             ▲              ▲              ▲
//!   get_items      add_item     remove_item      edit_item
//! ```
//!
//! ## Example
//!
//! ```
//! use flashlist::storage::{ItemStore, StoreError};
//! use std::sync::Arc;
//!
//! let store = Arc::new(ItemStore::new());
//!
//! store.add_item("milk").unwrap();
//! assert_eq!(store.remove_item("eggs"), Err(StoreError::NotFound("eggs".into())));
//! assert_eq!(store.get_items(), vec!["milk".to_string()]);
//! ```

pub mod store;

// Re-export commonly used types
pub use store::{ItemStore, StoreError, StoreResult, StoreStats};
