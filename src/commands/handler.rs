//! Command Handler
//!
//! This module turns one decoded frame into one [`Response`]. It owns no state
//! of its own: every action is forwarded to the shared [`ItemStore`].
//!
//! ## Supported Actions
//!
//! - `get_items` - Return the whole list under `data`
//! - `add_item {item}` - Append an item
//! - `remove_item {item}` - Remove the first matching item
//! - `edit_item {old_item, new_item}` - Rename the first matching item in place
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │  decode()   │───>│  dispatch() │───>│  ItemStore  │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │         │                  │                                │
//! │         └──── Err ─────────┴──────> Response::error         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error produced here ever reaches the connection loop. Every failure,
//! including a panic inside dispatch, becomes an error [`Response`].

use crate::protocol::{decode_request, ProtocolError, Request, Response};
use crate::storage::{ItemStore, StoreResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Dispatches requests to the shared item store.
#[derive(Clone)]
pub struct CommandHandler {
    /// The shared store
    store: Arc<ItemStore>,
}

impl CommandHandler {
    /// Creates a new command handler backed by `store`.
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self { store }
    }

    /// Returns the store this handler dispatches to.
    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    /// Decodes a frame payload and executes it.
    ///
    /// # Returns
    ///
    /// The response to send back to the client. This never fails.
    pub fn execute(&self, frame: &[u8]) -> Response {
        let request = match decode_request(frame) {
            Ok(request) => request,
            Err(e) => {
                if let ProtocolError::UnknownAction(action) = &e {
                    debug!(action = ?action, "Unknown action");
                } else {
                    debug!(error = %e, "Failed to decode request");
                }
                return Response::error(e.to_string());
            }
        };

        let action = request.action();
        guarded(action, || self.dispatch(request))
    }

    /// Executes an already-decoded request against the store.
    pub fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::GetItems => Response::items(self.store.get_items()),
            Request::AddItem { item } => into_response(self.store.add_item(&item)),
            Request::RemoveItem { item } => into_response(self.store.remove_item(&item)),
            Request::EditItem { old_item, new_item } => {
                into_response(self.store.edit_item(&old_item, &new_item))
            }
        }
    }
}

/// Maps a store result to the response sent on the wire.
fn into_response(result: StoreResult) -> Response {
    match result {
        Ok(message) => Response::success(message),
        Err(e) => Response::error(e.to_string()),
    }
}

/// Runs `f`, turning a panic into an error response carrying its message.
fn guarded(action: &'static str, f: impl FnOnce() -> Response) -> Response {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(response) => response,
        Err(payload) => {
            let description = panic_message(payload.as_ref());
            error!(action, error = %description, "Request handler panicked");
            Response::error(description)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal error.".to_string()
    }
}
