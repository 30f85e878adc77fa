//! Value definitions
//!
//! The typed data unit stored under a key.

use std::collections::BTreeSet;
use std::fmt;

/// Value-type tags used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueType {
    Text = 0x01,
    Integer = 0x02,
    Set = 0x03,
}

impl ValueType {
    /// Map a wire tag back to its value type
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(ValueType::Text),
            0x02 => Some(ValueType::Integer),
            0x03 => Some(ValueType::Set),
            _ => None,
        }
    }
}

/// A stored or returned value
///
/// Sets are kept ordered so that encoding is deterministic; element order
/// carries no meaning on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// UTF-8 text
    Text(String),

    /// Signed 64-bit integer
    Integer(i64),

    /// Deduplicated string elements
    Set(BTreeSet<String>),
}

impl Value {
    /// The acknowledgement value returned by writes
    pub fn ok() -> Self {
        Value::Text("OK".to_string())
    }

    /// Build a set value from anything yielding strings
    pub fn set_of<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    /// Get the value type
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Text(_) => ValueType::Text,
            Value::Integer(_) => ValueType::Integer,
            Value::Set(_) => ValueType::Set,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<BTreeSet<String>> for Value {
    fn from(set: BTreeSet<String>) -> Self {
        Value::Set(set)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{:?}", text),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Set(set) => {
                write!(f, "{{")?;
                for (i, element) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", element)?;
                }
                write!(f, "}}")
            }
        }
    }
}
