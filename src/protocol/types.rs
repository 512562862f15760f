//! Wire Data Types
//!
//! This module defines the application-level messages carried inside each frame.
//!
//! ## Request Format
//!
//! A request is a MessagePack map:
//!
//! ```text
//! { "action": "add_item", "data": { "item": "milk" } }
//! ```
//!
//! `data` is optional and defaults to an empty map.
//!
//! ## Response Format
//!
//! ```text
//! { "status": "success", "data": ["milk", "eggs"] }         // get_items
//! { "status": "success", "message": "Item 'milk' added." }  // mutations
//! { "status": "error",   "message": "Unknown action." }
//! ```
//!
//! Optional fields that are absent are omitted from the map entirely.

use serde::{Deserialize, Serialize};

/// Action names recognised on the wire
pub mod action {
    pub const GET_ITEMS: &str = "get_items";
    pub const ADD_ITEM: &str = "add_item";
    pub const REMOVE_ITEM: &str = "remove_item";
    pub const EDIT_ITEM: &str = "edit_item";
}

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Read a snapshot of the whole list
    GetItems,

    /// Append an item. An absent item arrives here as the empty string.
    AddItem { item: String },

    /// Remove the first occurrence of an item
    RemoveItem { item: String },

    /// Rename the first occurrence of `old_item` to `new_item`
    EditItem { old_item: String, new_item: String },
}

impl Request {
    /// Returns the wire name of this request's action.
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetItems => action::GET_ITEMS,
            Request::AddItem { .. } => action::ADD_ITEM,
            Request::RemoveItem { .. } => action::REMOVE_ITEM,
            Request::EditItem { .. } => action::EDIT_ITEM,
        }
    }
}

/// Outcome tag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// A response sent back for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
}

impl Response {
    /// Creates a success response carrying a confirmation message.
    ///
    /// # Example
    /// ```
    /// use flashlist::protocol::Response;
    /// let ok = Response::success("Item 'milk' added.");
    /// assert!(ok.is_success());
    /// ```
    pub fn success(message: impl Into<String>) -> Self {
        Response {
            status: Status::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Creates a success response carrying the list of items.
    pub fn items(items: Vec<String>) -> Self {
        Response {
            status: Status::Success,
            message: None,
            data: Some(items),
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Response {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Returns true if this response reports success.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Returns true if this response reports an error.
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self.status {
            Status::Success => "success",
            Status::Error => "error",
        };
        match (&self.message, &self.data) {
            (Some(message), _) => write!(f, "{}: {}", status, message),
            (None, Some(data)) => write!(f, "{}: {} item(s)", status, data.len()),
            (None, None) => write!(f, "{}", status),
        }
    }
}
