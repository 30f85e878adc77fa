//! Connection Handler
//!
//! Services a single client connection on behalf of the event loop.

use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use mio::net::TcpStream;

use crate::engine::Engine;
use crate::error::{DecodeError, Result};
use crate::protocol::{decode_request, encode_response, Response};

/// Pause between write attempts while the socket's send buffer is full
const WRITE_BACKOFF: Duration = Duration::from_millis(1);

/// What the event loop should do with a connection after servicing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Keep the registration, wait for the next readiness event
    Open,

    /// Peer reached end-of-stream; deregister and drop
    Closed,
}

/// A registered client connection
pub struct Connection {
    /// Non-blocking TCP stream (registered with the poll)
    stream: TcpStream,

    /// Scratch region for incoming bytes. Only `read_buf[..n]` of the
    /// current read is ever looked at, so stale bytes never leak into a
    /// later request.
    read_buf: Vec<u8>,

    /// Encoded response awaiting the socket; empty between requests
    write_buf: BytesMut,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Wrap an accepted stream
    pub fn new(stream: TcpStream, peer_addr: SocketAddr, buffer_size: usize) -> Self {
        Self {
            stream,
            read_buf: vec![0u8; buffer_size],
            write_buf: BytesMut::with_capacity(buffer_size),
            peer_addr: peer_addr.to_string(),
        }
    }

    /// Service a read-readiness event
    ///
    /// Every successful read is treated as exactly one request: it is
    /// decoded, executed and answered before the next read. Reading stops
    /// once the socket would block, since readiness is edge-triggered.
    ///
    /// A read that fills the whole buffer is answered with
    /// `Error("Buffer overflow")` and every byte still queued is dropped.
    pub fn on_readable(&mut self, engine: &mut Engine) -> Result<ConnectionState> {
        loop {
            let n = match self.stream.read(&mut self.read_buf) {
                Ok(0) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(ConnectionState::Closed);
                }
                Ok(n) => n,
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(ConnectionState::Open);
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if n == self.read_buf.len() {
                // The request may not fit: drop everything queued so none of
                // its tail is decoded as a command of its own.
                let (discarded, eof) = self.discard_pending()?;
                tracing::warn!(
                    "Request from {} fills the {}-byte buffer, discarded {} more bytes",
                    self.peer_addr,
                    self.read_buf.len(),
                    discarded
                );

                let error = DecodeError::Oversized {
                    limit: self.read_buf.len(),
                };
                self.send_response(&engine.reject(&error))?;

                if eof {
                    return Ok(ConnectionState::Closed);
                }
                continue;
            }

            let response = match decode_request(&self.read_buf[..n]) {
                Ok(request) => {
                    tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);
                    engine.execute(request)
                }
                Err(e) => engine.reject(&e),
            };

            self.send_response(&response)?;
        }
    }

    /// Read and drop whatever is queued on the socket
    ///
    /// Returns the number of bytes dropped and whether the peer hit
    /// end-of-stream meanwhile.
    fn discard_pending(&mut self) -> Result<(usize, bool)> {
        let mut discarded = 0;
        loop {
            match self.stream.read(&mut self.read_buf) {
                Ok(0) => return Ok((discarded, true)),
                Ok(n) => discarded += n,
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Ok((discarded, false));
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Encode a response and write all of it to the socket
    fn send_response(&mut self, response: &Response) -> Result<()> {
        self.write_buf.clear();
        encode_response(response, &mut self.write_buf);

        // The socket is non-blocking but the response must go out in full
        // before the loop moves on; back off while the peer's window is full.
        while self.write_buf.has_remaining() {
            match self.stream.write(&self.write_buf) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero).into()),
                Ok(n) => self.write_buf.advance(n),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(WRITE_BACKOFF);
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// The underlying stream, for (de)registration
    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
