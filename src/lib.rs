//! # Jaguatirica
//!
//! An in-memory, typed key-value store with:
//! - Text, integer and string-set values
//! - Overflow-checked counters and set algebra (add, union, intersection)
//! - A compact tagged binary protocol over TCP
//! - A single-threaded readiness loop (one writer, total command order)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Readiness Loop (mio)                        │
//! │              (Many Clients, One Thread)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ readable bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Wire Codec                               │
//! │            (Request decode / Response encode)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Command Engine                             │
//! │              (HashMap<String, Value>)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod engine;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CommandError, DecodeError, JaguatiricaError, Result};
pub use config::Config;
pub use engine::Engine;
pub use client::Client;
pub use network::{Server, ShutdownHandle};
pub use protocol::{Request, Response, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Jaguatirica
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
