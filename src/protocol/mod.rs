//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (Tagged Binary)
//!
//! Every packet starts with a one-byte type tag; the fields that follow are
//! fixed by the tag. Strings are length-prefixed (u32, big-endian).
//!
//! ### Requests
//! - 0x01: GET    - key
//! - 0x02: SET    - key + value
//! - 0x03: INCR   - key
//! - 0x04: DECR   - key
//! - 0x05: SADD   - key + elements
//! - 0x06: SUNION - keys
//! - 0x07: SINTER - keys (at least one)
//!
//! ### Responses
//! Response tags carry the high bit (0x80):
//! - 0x81: OK    - value
//! - 0x82: ERROR - reason
//!
//! ### Value Types
//! - 0x01: TEXT    - string
//! - 0x02: INTEGER - i64
//! - 0x03: SET     - elements

mod codec;
mod request;
mod response;
mod value;

pub use codec::{
    decode_request, decode_response, decode_value, encode_request, encode_response, encode_value,
};
pub use request::{Request, RequestType};
pub use response::{Response, ResponseType, RESPONSE_FLAG};
pub use value::{Value, ValueType};
