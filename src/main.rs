//! FlashList - A Shared, Network-Accessible Mutable List
//!
//! This is the main entry point for the FlashList server.
//! It sets up logging, the TCP listener and the shared store, then accepts
//! connections until Ctrl+C.

use clap::Parser;
use flashlist::config::ServerConfig;
use flashlist::connection::ConnectionStats;
use flashlist::server::accept_loop;
use flashlist::storage::ItemStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments and environment
    let config = ServerConfig::parse();

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Create the store (shared across all connections)
    let store = Arc::new(ItemStore::new());
    info!("Item store initialized");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        version = flashlist::VERSION,
        max_frame_size = config.max_frame_size,
        "Listening on {}",
        config.bind_address()
    );

    // Set up graceful shutdown
    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping server..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    // Main accept loop
    tokio::select! {
        _ = accept_loop(listener, Arc::clone(&store), Arc::clone(&stats), config.max_frame_size) => {}
        _ = shutdown => {}
    }

    let store_stats = store.stats();
    info!(
        items = store_stats.len,
        adds = store_stats.adds,
        removes = store_stats.removes,
        edits = store_stats.edits,
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        requests = stats.requests_processed.load(Ordering::Relaxed),
        "Server shutdown complete"
    );
    Ok(())
}
