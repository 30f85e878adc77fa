//! Client
//!
//! Blocking TCP client for a Jaguatirica server.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::BytesMut;

use crate::error::{JaguatiricaError, Result};
use crate::protocol::{decode_response, encode_request, Request, Response, Value};

/// Size of each read while waiting for a response
const READ_CHUNK: usize = 64 * 1024;

/// A connection to a Jaguatirica server
pub struct Client {
    stream: TcpStream,

    /// Bytes of the response read so far
    read_buf: BytesMut,

    /// Encoded outgoing request
    write_buf: BytesMut,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            read_buf: BytesMut::with_capacity(READ_CHUNK),
            write_buf: BytesMut::new(),
        })
    }

    /// Configure connection timeouts (0 disables a timeout)
    pub fn set_timeouts(&self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Send one request and wait for its response
    ///
    /// The request goes out in a single write; the server treats each read
    /// as one whole request.
    pub fn request(&mut self, request: &Request) -> Result<Response> {
        self.write_buf.clear();
        encode_request(request, &mut self.write_buf);
        self.stream.write_all(&self.write_buf)?;
        self.stream.flush()?;

        self.read_response()
    }

    /// Read until a complete response has arrived
    fn read_response(&mut self) -> Result<Response> {
        self.read_buf.clear();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let n = self.stream.read(&mut chunk)?;
            if n == 0 {
                return Err(JaguatiricaError::Network(
                    "connection closed before a full response arrived".to_string(),
                ));
            }
            self.read_buf.extend_from_slice(&chunk[..n]);

            match decode_response(&self.read_buf) {
                Ok(response) => return Ok(response),
                Err(e) if e.is_incomplete() => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    // =========================================================================
    // Command helpers
    // =========================================================================

    pub fn get(&mut self, key: &str) -> Result<Response> {
        self.request(&Request::Get {
            key: key.to_string(),
        })
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<Response> {
        self.request(&Request::SetValue {
            key: key.to_string(),
            value,
        })
    }

    pub fn increment(&mut self, key: &str) -> Result<Response> {
        self.request(&Request::Increment {
            key: key.to_string(),
        })
    }

    pub fn decrement(&mut self, key: &str) -> Result<Response> {
        self.request(&Request::Decrement {
            key: key.to_string(),
        })
    }

    pub fn set_add(&mut self, key: &str, values: &[&str]) -> Result<Response> {
        self.request(&Request::SetAdd {
            key: key.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    pub fn set_union(&mut self, keys: &[&str]) -> Result<Response> {
        self.request(&Request::SetUnion {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        })
    }

    pub fn set_intersection(&mut self, keys: &[&str]) -> Result<Response> {
        self.request(&Request::SetIntersection {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        })
    }

    /// Write raw bytes and read back one response
    ///
    /// Used to poke the server with hand-built (possibly malformed) packets.
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<Response> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        self.read_response()
    }
}
