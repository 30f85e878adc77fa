//! TCP Server
//!
//! Single-threaded readiness loop: accepts connections and services them
//! one event at a time.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token, Waker};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{JaguatiricaError, Result};
use super::connection::{Connection, ConnectionState};

/// Token of the listening socket
const LISTENER: Token = Token(0);

/// Token of the shutdown waker
const WAKER: Token = Token(1);

/// First token handed out to a client connection
const FIRST_CONNECTION_TOKEN: usize = 2;

/// Stops a running [`Server`] from any thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    waker: Arc<Waker>,
}

impl ShutdownHandle {
    /// Ask the server to stop; `run` returns after the current batch of events
    pub fn shutdown(&self) -> Result<()> {
        self.flag.store(true, Ordering::SeqCst);
        self.waker.wake()?;
        Ok(())
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// TCP server for Jaguatirica
pub struct Server {
    config: Config,
    poll: Poll,
    listener: TcpListener,
    engine: Engine,

    /// Open connections by poll token
    connections: HashMap<Token, Connection>,
    next_token: usize,

    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listening socket and set up the poll
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;
        let addr = config.resolve_listen_addr()?;

        let poll = Poll::new()?;
        let mut listener = TcpListener::bind(addr).map_err(|e| {
            JaguatiricaError::Network(format!("cannot bind {}: {}", addr, e))
        })?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)?;

        let waker = Waker::new(poll.registry(), WAKER)?;
        let shutdown = ShutdownHandle {
            flag: Arc::new(AtomicBool::new(false)),
            waker: Arc::new(waker),
        };

        tracing::info!("Server running @ {}", listener.local_addr()?);

        Ok(Self {
            config,
            poll,
            listener,
            engine: Engine::new(),
            connections: HashMap::new(),
            next_token: FIRST_CONNECTION_TOKEN,
            shutdown,
        })
    }

    /// The address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that stops `run` from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Run the event loop (blocking until shutdown)
    ///
    /// Only a failure of the poll itself ends the loop with an error;
    /// accept and connection errors are logged and survived.
    pub fn run(&mut self) -> Result<()> {
        let mut events = Events::with_capacity(self.config.events_capacity);

        while !self.shutdown.is_shutdown() {
            self.turn(&mut events, None)?;
        }

        self.close_all();
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Wait up to `timeout` for readiness and dispatch one batch of events
    ///
    /// Lets a caller drive the loop step by step instead of handing the
    /// thread over to `run`.
    pub fn run_once(&mut self, timeout: Option<Duration>) -> Result<()> {
        let mut events = Events::with_capacity(self.config.events_capacity);
        self.turn(&mut events, timeout)
    }

    fn turn(&mut self, events: &mut Events, timeout: Option<Duration>) -> Result<()> {
        if let Err(e) = self.poll.poll(events, timeout) {
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(e.into());
        }

        for event in events.iter() {
            match event.token() {
                LISTENER => self.accept_connections(),
                WAKER => tracing::debug!("Shutdown requested"),
                token => self.service(token),
            }
        }
        Ok(())
    }

    /// Accept every pending connection on the listener
    fn accept_connections(&mut self) {
        loop {
            let (mut stream, peer_addr) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    return;
                }
            };

            if self.connections.len() >= self.config.max_connections {
                tracing::warn!(
                    "Rejecting {}: connection limit of {} reached",
                    peer_addr,
                    self.config.max_connections
                );
                continue;
            }

            // Disable Nagle's algorithm for low latency
            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!("Could not set TCP_NODELAY for {}: {}", peer_addr, e);
            }

            let token = Token(self.next_token);
            self.next_token += 1;

            if let Err(e) = self
                .poll
                .registry()
                .register(&mut stream, token, Interest::READABLE)
            {
                tracing::warn!("Failed to register {}: {}", peer_addr, e);
                continue;
            }

            tracing::debug!("Connection established from {}", peer_addr);
            self.connections.insert(
                token,
                Connection::new(stream, peer_addr, self.config.buffer_size),
            );
        }
    }

    /// Service a readiness event on a client connection
    fn service(&mut self, token: Token) {
        let connection = match self.connections.get_mut(&token) {
            Some(connection) => connection,
            None => return,
        };

        match connection.on_readable(&mut self.engine) {
            Ok(ConnectionState::Open) => {}
            Ok(ConnectionState::Closed) => self.close(token),
            Err(JaguatiricaError::Io(ref e)) if is_disconnect(e) => {
                tracing::debug!("Client {} went away: {}", connection.peer_addr(), e);
                self.close(token);
            }
            Err(e) => {
                tracing::warn!("Error on connection {}: {}", connection.peer_addr(), e);
                self.close(token);
            }
        }
    }

    /// Deregister and drop a connection
    fn close(&mut self, token: Token) {
        if let Some(mut connection) = self.connections.remove(&token) {
            if let Err(e) = self.poll.registry().deregister(connection.stream_mut()) {
                tracing::debug!("Failed to deregister {}: {}", connection.peer_addr(), e);
            }
        }
    }

    fn close_all(&mut self) {
        let tokens: Vec<Token> = self.connections.keys().copied().collect();
        for token in tokens {
            self.close(token);
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of currently open connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

/// Errors that just mean the peer is gone
fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}
