//! Error types for Jaguatirica
//!
//! Three layers of failure:
//! - [`JaguatiricaError`]: transport, configuration and client-side failures
//! - [`DecodeError`]: malformed bytes on the wire
//! - [`CommandError`]: a well-formed command that cannot be applied to the state
//!
//! Only the first one ever escapes a connection. The other two are turned into
//! `Error` responses and sent back to the client.

use thiserror::Error;

/// Result type alias using JaguatiricaError
pub type Result<T> = std::result::Result<T, JaguatiricaError>;

/// Unified error type for Jaguatirica operations
#[derive(Debug, Error)]
pub enum JaguatiricaError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed packet: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure to decode a packet or value from a byte buffer.
///
/// Every variant belongs to the "malformed request" class: the connection
/// survives and the client receives an `Error` response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the field declares
    #[error("truncated {field}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("unknown packet type 0x{0:02x}")]
    UnknownTag(u8),

    /// A response tag showed up where a request was expected
    #[error("response packet 0x{0:02x} sent as a request")]
    UnexpectedResponse(u8),

    #[error("unknown term type 0x{0:02x}")]
    UnknownValueTag(u8),

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("set intersection needs at least one key")]
    EmptyKeyList,

    /// The packet filled the whole read buffer, so it cannot be trusted
    #[error("packet does not fit the {limit}-byte read buffer")]
    Oversized { limit: usize },
}

impl DecodeError {
    /// True when more bytes could turn this into a successful decode.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }

    /// The reason string carried by the `Error` response for this failure.
    pub fn reason(&self) -> &'static str {
        match self {
            DecodeError::Truncated { .. } | DecodeError::Oversized { .. } => "Buffer overflow",
            DecodeError::UnknownValueTag(_) => "Invalid term",
            DecodeError::UnknownTag(_)
            | DecodeError::UnexpectedResponse(_)
            | DecodeError::InvalidUtf8(_)
            | DecodeError::EmptyKeyList => "Invalid packet",
        }
    }
}

/// A command that is well-formed but cannot be applied to the current state.
///
/// `Display` yields the stable reason string sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unbound term")]
    Unbound,

    #[error("Term is not an integer")]
    NotAnInteger,

    #[error("Term is not a set")]
    NotASet,

    #[error("Integer overflow")]
    Overflow,

    #[error("Integer underflow")]
    Underflow,

    #[error("Invalid packet")]
    InvalidPacket,
}
