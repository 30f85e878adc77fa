//! Network Module
//!
//! TCP server and connection handling.
//!
//! ## Architecture
//! - One thread, one `mio::Poll`
//! - The listener and every connection are registered for read readiness
//! - Each readable event is read, decoded, executed and answered in place
//! - Commands never run concurrently, so the engine needs no locks

mod connection;
mod server;

pub use connection::{Connection, ConnectionState};
pub use server::{Server, ShutdownHandle};
