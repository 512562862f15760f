//! Accept Loop
//!
//! Accepts TCP connections and spawns one [`handle_connection`] task per
//! client. Every task gets its own [`CommandHandler`] over the same store.

use crate::commands::CommandHandler;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::ItemStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error};

/// Runs forever, accepting connections from `listener`.
pub async fn accept_loop(
    listener: TcpListener,
    store: Arc<ItemStore>,
    stats: Arc<ConnectionStats>,
    max_frame_size: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!(client = %addr, error = %e, "Failed to set TCP_NODELAY");
                }

                // Create a command handler for this connection
                let handler = CommandHandler::new(Arc::clone(&store));
                let stats = Arc::clone(&stats);

                // Spawn a task to handle this connection
                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats, max_frame_size).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
