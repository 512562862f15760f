//! Server configuration.
//!
//! Every option can be given as a flag or an environment variable:
//!
//! - `--host` / `FLASHLIST_HOST` (default: "127.0.0.1")
//! - `--port` / `FLASHLIST_PORT` (default: 8765)
//! - `--max-frame-size` / `FLASHLIST_MAX_FRAME_SIZE` (default: 1 MiB)
//! - `--log-level` / `FLASHLIST_LOG` (default: "info", any `EnvFilter` directive)

use crate::protocol::MAX_FRAME_SIZE;
use crate::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;

/// Server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "flashlist")]
#[command(about = "A shared in-memory list served over length-delimited MessagePack frames")]
#[command(version)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(long, env = "FLASHLIST_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "FLASHLIST_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Largest frame payload accepted from a client, in bytes
    #[arg(long, env = "FLASHLIST_MAX_FRAME_SIZE", default_value_t = MAX_FRAME_SIZE)]
    pub max_frame_size: usize,

    /// Log filter, e.g. "info" or "flashlist=debug"
    #[arg(long, env = "FLASHLIST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_frame_size: MAX_FRAME_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
