//! Configuration for Jaguatirica
//!
//! Centralized configuration with sensible defaults.

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::{JaguatiricaError, Result};

/// Default host, matching the server binary
pub const DEFAULT_HOST: &str = "localhost";

/// Default TCP port
pub const DEFAULT_PORT: u16 = 8345;

/// Main configuration for a Jaguatirica server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (host:port)
    pub listen_addr: String,

    /// Max concurrent client connections; extra connections are dropped on accept
    pub max_connections: usize,

    // -------------------------------------------------------------------------
    // Event Loop Configuration
    // -------------------------------------------------------------------------
    /// Size of the per-connection scratch buffer. Requests must be strictly
    /// smaller: a read that fills the buffer is answered with
    /// `Error("Buffer overflow")` and the rest of the queued bytes are dropped,
    /// so the tail of an oversized request is never run as a command.
    pub buffer_size: usize,

    /// Capacity of the readiness event batch handed out by each poll
    pub events_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            max_connections: 1024,
            buffer_size: 4096,
            events_capacity: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve `listen_addr` to the first socket address it names.
    pub fn resolve_listen_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .to_socket_addrs()
            .map_err(|e| {
                JaguatiricaError::Config(format!(
                    "cannot resolve listen address {}: {}",
                    self.listen_addr, e
                ))
            })?
            .next()
            .ok_or_else(|| {
                JaguatiricaError::Config(format!(
                    "listen address {} resolved to nothing",
                    self.listen_addr
                ))
            })
    }

    /// Check the numeric limits before the server starts
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(JaguatiricaError::Config(
                "buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.events_capacity == 0 {
            return Err(JaguatiricaError::Config(
                "events_capacity must be greater than zero".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(JaguatiricaError::Config(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the per-connection read buffer size (in bytes)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set how many readiness events one poll may return
    pub fn events_capacity(mut self, capacity: usize) -> Self {
        self.config.events_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
