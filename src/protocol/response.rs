//! Response definitions
//!
//! Represents responses to clients.

use crate::error::{CommandError, DecodeError};
use super::Value;

/// High bit set on every response tag
pub const RESPONSE_FLAG: u8 = 0x80;

/// Response type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseType {
    Ok = 0x01 | RESPONSE_FLAG,
    Error = 0x02 | RESPONSE_FLAG,
}

impl ResponseType {
    /// Map a wire tag back to its response type
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x81 => Some(ResponseType::Ok),
            0x82 => Some(ResponseType::Error),
            _ => None,
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Success, carrying the resulting value
    Ok(Value),

    /// Failure, carrying a stable reason string
    Error(String),
}

impl Response {
    /// Create an OK response acknowledging a write
    pub fn ack() -> Self {
        Response::Ok(Value::ok())
    }

    /// Create an ERROR response
    pub fn error(reason: impl Into<String>) -> Self {
        Response::Error(reason.into())
    }

    /// Get the response type
    pub fn response_type(&self) -> ResponseType {
        match self {
            Response::Ok(_) => ResponseType::Ok,
            Response::Error(_) => ResponseType::Error,
        }
    }
}

impl From<CommandError> for Response {
    fn from(err: CommandError) -> Self {
        Response::Error(err.to_string())
    }
}

impl From<&DecodeError> for Response {
    fn from(err: &DecodeError) -> Self {
        Response::Error(err.reason().to_string())
    }
}

impl From<Result<Value, CommandError>> for Response {
    fn from(result: Result<Value, CommandError>) -> Self {
        match result {
            Ok(value) => Response::Ok(value),
            Err(err) => err.into(),
        }
    }
}
