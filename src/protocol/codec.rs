//! MessagePack Codec
//!
//! This module converts between frame payloads and the typed messages in
//! [`crate::protocol::types`]. Framing itself (where one message ends and the
//! next begins) is handled by [`LengthDelimitedCodec`]; this module only ever
//! sees complete payloads.
//!
//! ## Decoding Rules
//!
//! 1. The payload must be a MessagePack map. Anything else is a [`ProtocolError::Decode`].
//! 2. A missing, non-string or unrecognised `action` is a [`ProtocolError::UnknownAction`].
//!    `data` is not looked at in that case, nor for `get_items`.
//! 3. Only the fields the action uses are read from `data`. Missing or nil
//!    fields decode as the empty string; other keys are ignored whatever their type.
//! 4. A used field of the wrong type (e.g. `item: 5`), or a `data` that is
//!    not a map, is a decode error.

use crate::protocol::types::{action, Request, Response};
use bytes::Bytes;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio_util::codec::LengthDelimitedCodec;

/// Default maximum request frame payload (1 MiB)
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Largest payload a 4-byte length prefix can describe
pub const MAX_RESPONSE_SIZE: usize = u32::MAX as usize;

/// Errors that can occur while decoding or encoding messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The payload is not a well-formed request map
    #[error("Invalid request: {0}")]
    Decode(String),

    /// The action tag is missing or not one we handle
    #[error("Unknown action.")]
    UnknownAction(Option<String>),

    /// A message could not be serialized
    #[error("Failed to encode message: {0}")]
    Encode(String),
}

/// The request map as written by [`encode_request`].
#[derive(Debug, Default, Serialize)]
struct RequestEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<RequestData>,
}

#[derive(Debug, Default, Serialize)]
struct RequestData {
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    old_item: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    new_item: Option<String>,
}

/// Any MessagePack value, keeping only what request decoding looks at.
///
/// Variants are tried in order, so `Other` swallows numbers, arrays,
/// binaries and maps with non-string keys.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Nil(()),
    Text(String),
    Map(BTreeMap<String, WireValue>),
    Other(IgnoredAny),
}

type WireMap = BTreeMap<String, WireValue>;

/// Builds the frame codec shared by the server and the client.
pub fn frame_codec(max_frame_size: usize) -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .max_frame_length(max_frame_size)
        .new_codec()
}

/// Decodes one frame payload into a [`Request`].
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] for malformed payloads and
/// [`ProtocolError::UnknownAction`] for a missing or unrecognised action.
pub fn decode_request(payload: &[u8]) -> Result<Request, ProtocolError> {
    let value: WireValue =
        rmp_serde::from_slice(payload).map_err(|e| ProtocolError::Decode(e.to_string()))?;

    let WireValue::Map(mut envelope) = value else {
        return Err(ProtocolError::Decode("expected a map".to_string()));
    };

    // A non-string action is as unusable as a missing one
    let name = match envelope.remove("action") {
        Some(WireValue::Text(name)) => name,
        _ => return Err(ProtocolError::UnknownAction(None)),
    };

    match name.as_str() {
        action::GET_ITEMS => Ok(Request::GetItems),
        action::ADD_ITEM => {
            let mut data = request_data(&mut envelope)?;
            Ok(Request::AddItem {
                item: string_field(&mut data, "item")?,
            })
        }
        action::REMOVE_ITEM => {
            let mut data = request_data(&mut envelope)?;
            Ok(Request::RemoveItem {
                item: string_field(&mut data, "item")?,
            })
        }
        action::EDIT_ITEM => {
            let mut data = request_data(&mut envelope)?;
            Ok(Request::EditItem {
                old_item: string_field(&mut data, "old_item")?,
                new_item: string_field(&mut data, "new_item")?,
            })
        }
        _ => Err(ProtocolError::UnknownAction(Some(name))),
    }
}

/// Takes the `data` map out of a request. Absent or nil means empty.
fn request_data(envelope: &mut WireMap) -> Result<WireMap, ProtocolError> {
    match envelope.remove("data") {
        None | Some(WireValue::Nil(())) => Ok(WireMap::new()),
        Some(WireValue::Map(data)) => Ok(data),
        Some(_) => Err(ProtocolError::Decode("'data' must be a map".to_string())),
    }
}

/// Takes one string field out of `data`. Absent or nil means empty.
fn string_field(data: &mut WireMap, key: &str) -> Result<String, ProtocolError> {
    match data.remove(key) {
        None | Some(WireValue::Nil(())) => Ok(String::new()),
        Some(WireValue::Text(value)) => Ok(value),
        Some(_) => Err(ProtocolError::Decode(format!("'{}' must be a string", key))),
    }
}

/// Encodes a [`Request`] into a frame payload.
pub fn encode_request(request: &Request) -> Result<Bytes, ProtocolError> {
    let data = match request {
        Request::GetItems => None,
        Request::AddItem { item } | Request::RemoveItem { item } => Some(RequestData {
            item: Some(item.clone()),
            ..RequestData::default()
        }),
        Request::EditItem { old_item, new_item } => Some(RequestData {
            old_item: Some(old_item.clone()),
            new_item: Some(new_item.clone()),
            ..RequestData::default()
        }),
    };

    let envelope = RequestEnvelope {
        action: Some(request.action().to_string()),
        data,
    };

    rmp_serde::to_vec_named(&envelope)
        .map(Bytes::from)
        .map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Encodes a [`Response`] into a frame payload.
pub fn encode_response(response: &Response) -> Result<Bytes, ProtocolError> {
    rmp_serde::to_vec_named(response)
        .map(Bytes::from)
        .map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decodes a frame payload into a [`Response`].
pub fn decode_response(payload: &[u8]) -> Result<Response, ProtocolError> {
    rmp_serde::from_slice(payload).map_err(|e| ProtocolError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::Status;

    #[derive(Serialize)]
    struct RawRequest<'a, D: Serialize> {
        action: &'a str,
        data: D,
    }

    fn raw<D: Serialize>(action: &str, data: D) -> Vec<u8> {
        rmp_serde::to_vec_named(&RawRequest { action, data }).unwrap()
    }

    #[test]
    fn test_decode_get_items_without_data() {
        let mut map = BTreeMap::new();
        map.insert("action", "get_items");
        let payload = rmp_serde::to_vec_named(&map).unwrap();

        assert_eq!(decode_request(&payload), Ok(Request::GetItems));
    }

    #[test]
    fn test_decode_add_item() {
        let payload = raw("add_item", BTreeMap::from([("item", "milk")]));
        assert_eq!(
            decode_request(&payload),
            Ok(Request::AddItem {
                item: "milk".to_string()
            })
        );
    }

    #[test]
    fn test_decode_missing_item_is_empty() {
        let payload = raw("add_item", BTreeMap::<&str, &str>::new());
        assert_eq!(
            decode_request(&payload),
            Ok(Request::AddItem {
                item: String::new()
            })
        );
    }

    #[test]
    fn test_decode_edit_item() {
        let payload = raw(
            "edit_item",
            BTreeMap::from([("old_item", "milk"), ("new_item", "bread")]),
        );
        assert_eq!(
            decode_request(&payload),
            Ok(Request::EditItem {
                old_item: "milk".to_string(),
                new_item: "bread".to_string()
            })
        );
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let payload = raw(
            "remove_item",
            BTreeMap::from([("item", "eggs"), ("quantity", "12")]),
        );
        assert_eq!(
            decode_request(&payload),
            Ok(Request::RemoveItem {
                item: "eggs".to_string()
            })
        );
    }

    #[test]
    fn test_decode_unknown_action() {
        let payload = raw("noop", BTreeMap::<&str, &str>::new());
        let err = decode_request(&payload).unwrap_err();

        assert_eq!(err, ProtocolError::UnknownAction(Some("noop".to_string())));
        assert_eq!(err.to_string(), "Unknown action.");
    }

    #[test]
    fn test_decode_missing_action() {
        let payload = rmp_serde::to_vec_named(&BTreeMap::<&str, &str>::new()).unwrap();
        assert_eq!(
            decode_request(&payload),
            Err(ProtocolError::UnknownAction(None))
        );
    }

    #[test]
    fn test_decode_garbage() {
        // 0xc1 is a reserved MessagePack marker
        assert!(matches!(
            decode_request(&[0xc1]),
            Err(ProtocolError::Decode(_))
        ));
        assert!(matches!(decode_request(&[]), Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_field_type() {
        let payload = raw("add_item", BTreeMap::from([("item", 5)]));
        let err = decode_request(&payload).unwrap_err();

        assert!(matches!(err, ProtocolError::Decode(_)));
        assert!(err.to_string().starts_with("Invalid request: "));
    }

    #[test]
    fn test_decode_non_map_payload() {
        let payloads = [
            rmp_serde::to_vec("get_items").unwrap(),
            rmp_serde::to_vec(&vec!["get_items"]).unwrap(),
            rmp_serde::to_vec(&("get_items", "milk")).unwrap(),
            rmp_serde::to_vec(&5).unwrap(),
        ];

        for payload in payloads {
            assert!(matches!(
                decode_request(&payload),
                Err(ProtocolError::Decode(_))
            ));
        }
    }

    #[test]
    fn test_decode_get_items_ignores_data() {
        assert_eq!(decode_request(&raw("get_items", "x")), Ok(Request::GetItems));
        assert_eq!(
            decode_request(&raw("get_items", BTreeMap::from([("item", 5)]))),
            Ok(Request::GetItems)
        );
        assert_eq!(
            decode_request(&raw("get_items", vec![1, 2, 3])),
            Ok(Request::GetItems)
        );
    }

    #[test]
    fn test_decode_unknown_action_ignores_data() {
        assert_eq!(
            decode_request(&raw("noop", "x")),
            Err(ProtocolError::UnknownAction(Some("noop".to_string())))
        );
        assert_eq!(
            decode_request(&raw("noop", BTreeMap::from([("item", 5)]))),
            Err(ProtocolError::UnknownAction(Some("noop".to_string())))
        );
    }

    #[test]
    fn test_decode_non_string_action() {
        #[derive(Serialize)]
        struct NumericAction {
            action: u8,
        }

        let payload = rmp_serde::to_vec_named(&NumericAction { action: 1 }).unwrap();
        assert_eq!(
            decode_request(&payload),
            Err(ProtocolError::UnknownAction(None))
        );
    }

    #[test]
    fn test_decode_ignores_unused_fields_of_any_type() {
        #[derive(Serialize)]
        struct Data {
            item: &'static str,
            old_item: u32,
            tags: Vec<u32>,
        }

        let payload = raw(
            "remove_item",
            Data {
                item: "milk",
                old_item: 5,
                tags: vec![1, 2],
            },
        );
        assert_eq!(
            decode_request(&payload),
            Ok(Request::RemoveItem {
                item: "milk".to_string()
            })
        );
    }

    #[test]
    fn test_decode_data_must_be_a_map_when_used() {
        let err = decode_request(&raw("add_item", "x")).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));

        let err = decode_request(&raw("edit_item", vec!["milk", "bread"])).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_decode_wrong_type_in_used_edit_field() {
        #[derive(Serialize)]
        struct Data {
            old_item: &'static str,
            new_item: bool,
        }

        let payload = raw(
            "edit_item",
            Data {
                old_item: "milk",
                new_item: true,
            },
        );
        assert_eq!(
            decode_request(&payload),
            Err(ProtocolError::Decode("'new_item' must be a string".to_string()))
        );
    }

    #[test]
    fn test_request_encoding_is_understood_by_decoder() {
        let requests = [
            Request::GetItems,
            Request::AddItem {
                item: "milk".into(),
            },
            Request::RemoveItem {
                item: "milk".into(),
            },
            Request::EditItem {
                old_item: "milk".into(),
                new_item: "bread".into(),
            },
        ];

        for request in requests {
            let payload = encode_request(&request).unwrap();
            assert_eq!(decode_request(&payload), Ok(request));
        }
    }

    #[test]
    fn test_response_round_trip() {
        let responses = [
            Response::success("Item 'milk' added."),
            Response::items(vec![]),
            Response::items(vec!["milk".into(), "milk".into(), "eggs".into()]),
            Response::error("Unknown action."),
        ];

        for response in responses {
            let payload = encode_response(&response).unwrap();
            assert_eq!(decode_response(&payload), Ok(response));
        }
    }

    #[test]
    fn test_response_wire_layout() {
        #[derive(Deserialize)]
        struct Wire {
            status: String,
            message: Option<String>,
        }

        let payload = encode_response(&Response::error("Item 'eggs' not found.")).unwrap();
        let wire: Wire = rmp_serde::from_slice(&payload).unwrap();
        assert_eq!(wire.status, "error");
        assert_eq!(wire.message.as_deref(), Some("Item 'eggs' not found."));

        // Absent optional fields are omitted, not sent as nil
        let keys: BTreeMap<String, IgnoredAny> = rmp_serde::from_slice(&payload).unwrap();
        assert_eq!(
            keys.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["message", "status"]
        );

        let payload = encode_response(&Response::items(vec![])).unwrap();
        let keys: BTreeMap<String, IgnoredAny> = rmp_serde::from_slice(&payload).unwrap();
        assert_eq!(
            keys.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["data", "status"]
        );
        assert_eq!(
            decode_response(&payload).unwrap().status,
            Status::Success
        );
    }
}
