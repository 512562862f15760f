//! Wire Protocol Implementation
//!
//! This module defines what travels inside each frame and how it is encoded.
//!
//! ## Overview
//!
//! Every frame carries one MessagePack map. Requests name an `action` and an
//! optional `data` map; responses carry a `status` plus either a `message` or
//! the item list under `data`.
//!
//! ## Modules
//!
//! - `types`: Defines `Request`, `Response` and `Status`
//! - `codec`: MessagePack encoding and the length-delimited frame codec
//!
//! ## Example
//!
//! ```
//! use flashlist::protocol::{decode_request, encode_request, Request};
//!
//! let frame = encode_request(&Request::AddItem { item: "milk".into() }).unwrap();
//! let request = decode_request(&frame).unwrap();
//! assert_eq!(request, Request::AddItem { item: "milk".into() });
//! ```

pub mod codec;
pub mod types;

// Re-export commonly used types for convenience
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, frame_codec, ProtocolError,
    MAX_FRAME_SIZE, MAX_RESPONSE_SIZE,
};
pub use types::{action, Request, Response, Status};
