//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! All integers are big-endian. There is no length header: a packet ends
//! where its last field ends.
//!
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Tag (1)  │           Fields (by tag)               │
//! └──────────┴─────────────────────────────────────────┘
//!
//! string   = len (4) + UTF-8 bytes
//! strings  = count (4) + count × string
//! value    = vtag (1) + Text: string | Integer: i64 (8) | Set: strings
//! ```
//!
//! ### Fields by Request Tag
//! - GET / INCR / DECR: key
//! - SET:               key + value
//! - SADD:              key + strings
//! - SUNION / SINTER:   strings
//!
//! ### Fields by Response Tag
//! - OK:    value
//! - ERROR: reason string
//!
//! Decoding checks the remaining length before every field and never reads
//! past the end of the input.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::DecodeError;
use super::{Request, RequestType, Response, ResponseType, Value, ValueType};

type DecodeResult<T> = std::result::Result<T, DecodeError>;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request into `dst`
pub fn encode_request(request: &Request, dst: &mut BytesMut) {
    dst.put_u8(request.request_type() as u8);

    match request {
        Request::Get { key } | Request::Increment { key } | Request::Decrement { key } => {
            put_string(dst, key);
        }
        Request::SetValue { key, value } => {
            put_string(dst, key);
            encode_value(value, dst);
        }
        Request::SetAdd { key, values } => {
            put_string(dst, key);
            put_strings(dst, values);
        }
        Request::SetUnion { keys } | Request::SetIntersection { keys } => {
            put_strings(dst, keys);
        }
    }
}

/// Decode one request from the front of `bytes`
///
/// Bytes after the end of the request are ignored.
pub fn decode_request(bytes: &[u8]) -> DecodeResult<Request> {
    let mut buf = bytes;
    let tag = get_u8(&mut buf, "packet type")?;

    let request_type = match RequestType::from_tag(tag) {
        Some(request_type) => request_type,
        None if ResponseType::from_tag(tag).is_some() => {
            return Err(DecodeError::UnexpectedResponse(tag));
        }
        None => return Err(DecodeError::UnknownTag(tag)),
    };

    match request_type {
        RequestType::Get => Ok(Request::Get {
            key: get_string(&mut buf, "key")?,
        }),
        RequestType::Set => {
            let key = get_string(&mut buf, "key")?;
            let value = get_value(&mut buf)?;
            Ok(Request::SetValue { key, value })
        }
        RequestType::Increment => Ok(Request::Increment {
            key: get_string(&mut buf, "key")?,
        }),
        RequestType::Decrement => Ok(Request::Decrement {
            key: get_string(&mut buf, "key")?,
        }),
        RequestType::SetAdd => {
            let key = get_string(&mut buf, "key")?;
            let values = get_strings(&mut buf, "set element")?;
            Ok(Request::SetAdd { key, values })
        }
        RequestType::SetUnion => Ok(Request::SetUnion {
            keys: get_strings(&mut buf, "key")?,
        }),
        RequestType::SetIntersection => {
            let keys = get_strings(&mut buf, "key")?;
            if keys.is_empty() {
                return Err(DecodeError::EmptyKeyList);
            }
            Ok(Request::SetIntersection { keys })
        }
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response into `dst`
pub fn encode_response(response: &Response, dst: &mut BytesMut) {
    dst.put_u8(response.response_type() as u8);

    match response {
        Response::Ok(value) => encode_value(value, dst),
        Response::Error(reason) => put_string(dst, reason),
    }
}

/// Decode one response from the front of `bytes`
pub fn decode_response(bytes: &[u8]) -> DecodeResult<Response> {
    let mut buf = bytes;
    let tag = get_u8(&mut buf, "packet type")?;

    match ResponseType::from_tag(tag) {
        Some(ResponseType::Ok) => Ok(Response::Ok(get_value(&mut buf)?)),
        Some(ResponseType::Error) => Ok(Response::Error(get_string(&mut buf, "reason")?)),
        None => Err(DecodeError::UnknownTag(tag)),
    }
}

// =============================================================================
// Value Encoding/Decoding
// =============================================================================

/// Encode a value (type tag + payload) into `dst`
pub fn encode_value(value: &Value, dst: &mut BytesMut) {
    dst.put_u8(value.value_type() as u8);

    match value {
        Value::Text(text) => put_string(dst, text),
        Value::Integer(i) => dst.put_i64(*i),
        Value::Set(set) => {
            put_len(dst, set.len());
            for element in set {
                put_string(dst, element);
            }
        }
    }
}

/// Decode one value from the front of `bytes`
pub fn decode_value(bytes: &[u8]) -> DecodeResult<Value> {
    let mut buf = bytes;
    get_value(&mut buf)
}

fn get_value(buf: &mut &[u8]) -> DecodeResult<Value> {
    let tag = get_u8(buf, "term type")?;

    match ValueType::from_tag(tag) {
        Some(ValueType::Text) => Ok(Value::Text(get_string(buf, "text")?)),
        Some(ValueType::Integer) => {
            ensure(buf, "integer", 8)?;
            Ok(Value::Integer(buf.get_i64()))
        }
        Some(ValueType::Set) => {
            let elements = get_strings(buf, "set element")?;
            Ok(Value::Set(elements.into_iter().collect()))
        }
        None => Err(DecodeError::UnknownValueTag(tag)),
    }
}

// =============================================================================
// Field helpers
// =============================================================================

fn ensure(buf: &&[u8], field: &'static str, needed: usize) -> DecodeResult<()> {
    if buf.remaining() < needed {
        return Err(DecodeError::Truncated {
            field,
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn get_u8(buf: &mut &[u8], field: &'static str) -> DecodeResult<u8> {
    ensure(buf, field, 1)?;
    Ok(buf.get_u8())
}

fn get_len(buf: &mut &[u8], field: &'static str) -> DecodeResult<usize> {
    ensure(buf, field, 4)?;
    Ok(buf.get_u32() as usize)
}

fn get_string(buf: &mut &[u8], field: &'static str) -> DecodeResult<String> {
    let len = get_len(buf, field)?;
    ensure(buf, field, len)?;

    let text = std::str::from_utf8(&buf[..len])
        .map_err(|_| DecodeError::InvalidUtf8(field))?
        .to_string();
    buf.advance(len);
    Ok(text)
}

fn get_strings(buf: &mut &[u8], field: &'static str) -> DecodeResult<Vec<String>> {
    let count = get_len(buf, field)?;

    // Every string needs at least its 4-byte length, so a count that cannot
    // fit in what is left must not drive the allocation.
    let mut strings = Vec::with_capacity(count.min(buf.remaining() / 4));
    for _ in 0..count {
        strings.push(get_string(buf, field)?);
    }
    Ok(strings)
}

fn put_len(dst: &mut BytesMut, len: usize) {
    debug_assert!(len <= u32::MAX as usize, "field length exceeds u32");
    dst.put_u32(len as u32);
}

fn put_string(dst: &mut BytesMut, s: &str) {
    put_len(dst, s.len());
    dst.put_slice(s.as_bytes());
}

fn put_strings(dst: &mut BytesMut, strings: &[String]) {
    put_len(dst, strings.len());
    for s in strings {
        put_string(dst, s);
    }
}
