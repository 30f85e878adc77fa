//! Codec Tests
//!
//! Tests for request, response and value encoding/decoding.

use bytes::BytesMut;
use jaguatirica::protocol::{
    decode_request, decode_response, decode_value, encode_request, encode_response, encode_value,
    Request, Response, Value,
};
use jaguatirica::DecodeError;

// =============================================================================
// Helper Functions
// =============================================================================

fn request_bytes(request: &Request) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_request(request, &mut buf);
    buf.to_vec()
}

fn response_bytes(response: &Response) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_response(response, &mut buf);
    buf.to_vec()
}

fn value_bytes(value: &Value) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_value(value, &mut buf);
    buf.to_vec()
}

// =============================================================================
// Exact Wire Layout Tests
// =============================================================================

#[test]
fn test_get_wire_layout() {
    let bytes = request_bytes(&Request::Get {
        key: "ab".to_string(),
    });
    assert_eq!(bytes, vec![0x01, 0, 0, 0, 2, b'a', b'b']);
}

#[test]
fn test_set_integer_wire_layout() {
    let bytes = request_bytes(&Request::SetValue {
        key: "k".to_string(),
        value: Value::Integer(-2),
    });
    assert_eq!(
        bytes,
        vec![
            0x02, 0, 0, 0, 1, b'k', // tag + key
            0x02, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, // integer
        ]
    );
}

#[test]
fn test_set_union_wire_layout() {
    let bytes = request_bytes(&Request::SetUnion {
        keys: vec!["a".to_string(), "b".to_string()],
    });
    assert_eq!(
        bytes,
        vec![0x06, 0, 0, 0, 2, 0, 0, 0, 1, b'a', 0, 0, 0, 1, b'b']
    );
}

#[test]
fn test_ok_text_response_layout() {
    let bytes = response_bytes(&Response::ack());
    assert_eq!(bytes, vec![0x81, 0x01, 0, 0, 0, 2, b'O', b'K']);
}

#[test]
fn test_error_response_layout() {
    let bytes = response_bytes(&Response::error("Unbound term"));
    let mut expected = vec![0x82, 0, 0, 0, 12];
    expected.extend_from_slice(b"Unbound term");
    assert_eq!(bytes, expected);
}

#[test]
fn test_set_value_layout() {
    let bytes = value_bytes(&Value::set_of(["x"]));
    assert_eq!(bytes, vec![0x03, 0, 0, 0, 1, 0, 0, 0, 1, b'x']);
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_every_request_type() {
    let requests = vec![
        Request::Get { key: "g".to_string() },
        Request::SetValue {
            key: "s".to_string(),
            value: Value::from("hello"),
        },
        Request::Increment { key: "i".to_string() },
        Request::Decrement { key: "d".to_string() },
        Request::SetAdd {
            key: "sa".to_string(),
            values: vec!["a".to_string(), "a".to_string(), "b".to_string()],
        },
        Request::SetUnion {
            keys: vec!["a".to_string(), "b".to_string()],
        },
        Request::SetIntersection {
            keys: vec!["a".to_string()],
        },
    ];

    for request in requests {
        let decoded = decode_request(&request_bytes(&request)).unwrap();
        assert_eq!(decoded, request);
    }
}

#[test]
fn test_value_roundtrip() {
    let values = vec![
        Value::Text(String::new()),
        Value::Text("héllo wörld".to_string()),
        Value::Integer(0),
        Value::Integer(i64::MAX),
        Value::Integer(i64::MIN),
        Value::Set(Default::default()),
        Value::set_of(["b", "a", "c"]),
    ];

    for value in values {
        assert_eq!(decode_value(&value_bytes(&value)).unwrap(), value);
    }
}

#[test]
fn test_set_decoding_ignores_element_order_and_duplicates() {
    let bytes = vec![
        0x03, 0, 0, 0, 3, // count
        0, 0, 0, 1, b'b', //
        0, 0, 0, 1, b'a', //
        0, 0, 0, 1, b'b',
    ];
    assert_eq!(decode_value(&bytes).unwrap(), Value::set_of(["a", "b"]));
}

#[test]
fn test_decode_response() {
    let response = Response::Ok(Value::set_of(["1", "2"]));
    assert_eq!(decode_response(&response_bytes(&response)).unwrap(), response);

    let response = Response::error("Integer overflow");
    assert_eq!(decode_response(&response_bytes(&response)).unwrap(), response);
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let mut bytes = request_bytes(&Request::Get { key: "k".to_string() });
    bytes.extend_from_slice(&[0xAA, 0xBB]);
    assert_eq!(
        decode_request(&bytes).unwrap(),
        Request::Get { key: "k".to_string() }
    );
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_oversized_is_not_incomplete() {
    // A client must not wait for more bytes after this one
    let err = DecodeError::Oversized { limit: 4096 };
    assert!(!err.is_incomplete());
    assert_eq!(err.reason(), "Buffer overflow");
}

#[test]
fn test_empty_buffer() {
    let err = decode_request(&[]).unwrap_err();
    assert!(err.is_incomplete());
    assert_eq!(err.reason(), "Buffer overflow");
}

#[test]
fn test_every_truncation_is_an_error() {
    let bytes = request_bytes(&Request::SetValue {
        key: "key".to_string(),
        value: Value::set_of(["one", "two", "three"]),
    });

    for len in 0..bytes.len() {
        let err = decode_request(&bytes[..len]).unwrap_err();
        assert!(err.is_incomplete(), "prefix of {} bytes gave {:?}", len, err);
    }
}

#[test]
fn test_declared_length_exceeds_buffer() {
    // GET with a key length of 1000 but only 3 bytes of key
    let bytes = vec![0x01, 0, 0, 0x03, 0xE8, b'a', b'b', b'c'];
    assert_eq!(
        decode_request(&bytes).unwrap_err(),
        DecodeError::Truncated {
            field: "key",
            needed: 1000,
            remaining: 3,
        }
    );
}

#[test]
fn test_huge_sequence_count_does_not_allocate() {
    let bytes = vec![0x06, 0xFF, 0xFF, 0xFF, 0xFF];
    assert!(decode_request(&bytes).unwrap_err().is_incomplete());
}

#[test]
fn test_unknown_request_tag() {
    let err = decode_request(&[0x42, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(err, DecodeError::UnknownTag(0x42));
    assert_eq!(err.reason(), "Invalid packet");
}

#[test]
fn test_response_tag_as_request() {
    let bytes = response_bytes(&Response::ack());
    let err = decode_request(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::UnexpectedResponse(0x81));
    assert_eq!(err.reason(), "Invalid packet");
}

#[test]
fn test_unknown_value_tag() {
    let bytes = vec![0x02, 0, 0, 0, 1, b'k', 0x09];
    let err = decode_request(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::UnknownValueTag(0x09));
    assert_eq!(err.reason(), "Invalid term");
}

#[test]
fn test_invalid_utf8_key() {
    let bytes = vec![0x01, 0, 0, 0, 2, 0xC3, 0x28];
    assert_eq!(
        decode_request(&bytes).unwrap_err(),
        DecodeError::InvalidUtf8("key")
    );
}

#[test]
fn test_empty_intersection_is_rejected() {
    let bytes = vec![0x07, 0, 0, 0, 0];
    let err = decode_request(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::EmptyKeyList);
    assert!(!err.is_incomplete());
}

#[test]
fn test_request_tag_as_response() {
    let bytes = request_bytes(&Request::Get { key: "k".to_string() });
    assert_eq!(
        decode_response(&bytes).unwrap_err(),
        DecodeError::UnknownTag(0x01)
    );
}
