//! Request definitions
//!
//! Represents commands from clients.

use super::Value;

/// Request type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestType {
    Get = 0x01,
    Set = 0x02,
    Increment = 0x03,
    Decrement = 0x04,
    SetAdd = 0x05,
    SetUnion = 0x06,
    SetIntersection = 0x07,
}

impl RequestType {
    /// Map a wire tag back to its request type
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(RequestType::Get),
            0x02 => Some(RequestType::Set),
            0x03 => Some(RequestType::Increment),
            0x04 => Some(RequestType::Decrement),
            0x05 => Some(RequestType::SetAdd),
            0x06 => Some(RequestType::SetUnion),
            0x07 => Some(RequestType::SetIntersection),
            _ => None,
        }
    }
}

/// A decoded client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Read the value bound to a key
    Get { key: String },

    /// Bind a value to a key, replacing whatever was there
    SetValue { key: String, value: Value },

    /// Add one to an integer (missing keys start at zero)
    Increment { key: String },

    /// Subtract one from an integer (missing keys start at zero)
    Decrement { key: String },

    /// Insert elements into a set, creating it if needed
    SetAdd { key: String, values: Vec<String> },

    /// Union of the sets stored under `keys`
    SetUnion { keys: Vec<String> },

    /// Intersection of the sets stored under `keys`
    SetIntersection { keys: Vec<String> },
}

impl Request {
    /// Get the request type
    pub fn request_type(&self) -> RequestType {
        match self {
            Request::Get { .. } => RequestType::Get,
            Request::SetValue { .. } => RequestType::Set,
            Request::Increment { .. } => RequestType::Increment,
            Request::Decrement { .. } => RequestType::Decrement,
            Request::SetAdd { .. } => RequestType::SetAdd,
            Request::SetUnion { .. } => RequestType::SetUnion,
            Request::SetIntersection { .. } => RequestType::SetIntersection,
        }
    }
}
