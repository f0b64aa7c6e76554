use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{NoteStashError, Result};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 1916;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Settings for the HTTP server and the on-disk stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind: String,
    pub port: u16,
    /// Directory holding `data.txt` and `data_readable.txt`
    pub data_dir: PathBuf,
    /// Largest request body `/save` will read
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("."),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Resolve `bind:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let raw = if self.bind.contains(':') && !self.bind.starts_with('[') {
            // bare IPv6 literal
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        };
        raw.parse()
            .map_err(|e| NoteStashError::Server(format!("invalid listen address '{}': {}", raw, e)))
    }
}
