//! Async Client
//!
//! A small client for the FlashList protocol. It holds one framed TCP
//! connection and sends one request at a time, waiting for its response.
//!
//! ## Example
//!
//! ```ignore
//! use flashlist::client::ListClient;
//!
//! let mut client = ListClient::connect("127.0.0.1:8765").await?;
//! client.add_item("milk").await?;
//! client.edit_item("milk", "bread").await?;
//! assert_eq!(client.get_items().await?, vec!["bread".to_string()]);
//! ```

use crate::protocol::{
    decode_response, encode_request, frame_codec, ProtocolError, Request, Response,
    MAX_RESPONSE_SIZE,
};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

/// Errors returned by [`ListClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server answered with `status: error`
    #[error("Server error: {0}")]
    Server(String),

    #[error("Connection closed by server")]
    ConnectionClosed,
}

/// A connection to a FlashList server.
pub struct ListClient {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
}

impl ListClient {
    /// Connects to the server at `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        Ok(Self {
            framed: Framed::new(stream, frame_codec(MAX_RESPONSE_SIZE)),
        })
    }

    /// Sends a request and waits for its response.
    ///
    /// An error response is returned as `Ok`; use the typed helpers to turn
    /// it into [`ClientError::Server`].
    pub async fn request(&mut self, request: &Request) -> Result<Response, ClientError> {
        let payload = encode_request(request)?;
        self.send_raw(payload).await
    }

    /// Sends an arbitrary payload as one frame and waits for the response.
    pub async fn send_raw(&mut self, payload: Bytes) -> Result<Response, ClientError> {
        self.framed.send(payload).await?;

        match self.framed.next().await {
            Some(frame) => Ok(decode_response(&frame?)?),
            None => Err(ClientError::ConnectionClosed),
        }
    }

    /// Returns the current list.
    pub async fn get_items(&mut self) -> Result<Vec<String>, ClientError> {
        let response = self.request(&Request::GetItems).await?;
        if response.is_error() {
            return Err(server_error(response));
        }
        Ok(response.data.unwrap_or_default())
    }

    /// Appends `item`, returning the server's confirmation.
    pub async fn add_item(&mut self, item: &str) -> Result<String, ClientError> {
        let request = Request::AddItem {
            item: item.to_string(),
        };
        into_message(self.request(&request).await?)
    }

    /// Removes the first occurrence of `item`.
    pub async fn remove_item(&mut self, item: &str) -> Result<String, ClientError> {
        let request = Request::RemoveItem {
            item: item.to_string(),
        };
        into_message(self.request(&request).await?)
    }

    /// Renames the first occurrence of `old_item` to `new_item`.
    pub async fn edit_item(
        &mut self,
        old_item: &str,
        new_item: &str,
    ) -> Result<String, ClientError> {
        let request = Request::EditItem {
            old_item: old_item.to_string(),
            new_item: new_item.to_string(),
        };
        into_message(self.request(&request).await?)
    }
}

fn server_error(response: Response) -> ClientError {
    ClientError::Server(response.message.unwrap_or_default())
}

fn into_message(response: Response) -> Result<String, ClientError> {
    if response.is_error() {
        return Err(server_error(response));
    }
    Ok(response.message.unwrap_or_default())
}
