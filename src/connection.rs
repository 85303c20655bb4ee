//! The connection loop: read bytes, frame lines, dispatch, write replies.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::{Action, Dispatcher};
use crate::error::ExitError;
use crate::protocol::Command;

/// Longest partial line kept while waiting for its terminator.
pub const MAX_LINE_LEN: usize = 8 * 1024;

const READ_CHUNK: usize = 4096;

/// How long a single write may block before the connection counts as lost.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Reassembles lines from reads that may split them anywhere.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    /// Set after an overlong line was dropped, until its terminator arrives.
    discarding: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Next complete line, without `\n` or `\r\n`. Empty lines are skipped.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        loop {
            let Some(i) = self.buf.iter().position(|&b| b == b'\n') else {
                if self.discarding {
                    self.buf.clear();
                } else if self.buf.len() > MAX_LINE_LEN {
                    warn!(len = self.buf.len(), "discarding overlong partial line");
                    self.buf.clear();
                    self.discarding = true;
                }
                return None;
            };
            if self.discarding {
                // rest of the dropped line
                self.buf.drain(..=i);
                self.discarding = false;
                continue;
            }
            let mut line: Vec<u8> = self.buf.drain(..=i).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if !line.is_empty() {
                return Some(line);
            }
        }
    }
}

/// A connected byte stream the loop can read from.
pub trait Transport: Read + Send {
    /// An independent write handle onto the same connection.
    fn try_clone_writer(&self) -> io::Result<Box<dyn Write + Send>>;
}

impl Transport for TcpStream {
    fn try_clone_writer(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(self.try_clone()?))
    }
}

/// Opens connections to the server.
pub trait Connector {
    type Stream: Transport;

    fn connect(&mut self) -> io::Result<Self::Stream>;

    /// Where this connector connects to, for messages.
    fn describe(&self) -> String;
}

pub struct TcpConnector {
    addr: String,
}

impl TcpConnector {
    pub const fn new(addr: String) -> Self {
        Self { addr }
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&mut self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(&self.addr)?;
        stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
        Ok(stream)
    }

    fn describe(&self) -> String {
        self.addr.clone()
    }
}

/// Shared write side of the current connection.
///
/// Cloned into the interrupt handler so it can say goodbye on whatever
/// connection is live at the time. The lock is held across the write, so
/// TCP streams carry [`WRITE_TIMEOUT`] to keep a stalled socket from
/// blocking the handler indefinitely.
#[derive(Clone, Default)]
pub struct Outbox {
    writer: Arc<Mutex<Option<Box<dyn Write + Send>>>>,
}

impl Outbox {
    fn attach(&self, writer: Box<dyn Write + Send>) {
        *self.writer.lock().unwrap_or_else(PoisonError::into_inner) = Some(writer);
    }

    fn detach(&self) {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Write one command and log it.
    pub fn send(&self, command: &Command) -> io::Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let writer = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "not connected"))?;
        info!(target: "javlabot::wire", "CLIENT: {command}");
        writer.write_all(&command.to_wire())?;
        writer.flush()
    }
}

/// Why a connection ended.
#[derive(Debug)]
enum Disconnect {
    ClosingLink,
    Eof,
    Io(io::Error),
}

/// The bot: one connection at a time, lines handled strictly in order.
pub struct Bot<C: Connector> {
    connector: C,
    username: String,
    realname: String,
    dispatcher: Dispatcher,
    outbox: Outbox,
}

impl<C: Connector> Bot<C> {
    pub fn new(config: &Config, connector: C) -> Self {
        Self {
            connector,
            username: config.username.clone(),
            realname: config.realname.clone(),
            dispatcher: Dispatcher::new(config),
            outbox: Outbox::default(),
        }
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Connect and listen until a connection cannot be (re)established.
    ///
    /// A dropped connection is replaced exactly once per drop; the ledger
    /// carries over to the new connection.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut stream = self.connect()?;
        loop {
            match self.listen(&mut stream) {
                Disconnect::ClosingLink => info!("server closed the link, reconnecting"),
                Disconnect::Eof => warn!("connection closed by server, reconnecting"),
                Disconnect::Io(e) => warn!("connection lost: {e}, reconnecting"),
            }
            self.outbox.detach();
            drop(stream);
            stream = self.connect()?;
        }
    }

    fn connect(&mut self) -> anyhow::Result<C::Stream> {
        let addr = self.connector.describe();
        let connect_error = |e: io::Error| ExitError::Connect {
            addr: addr.clone(),
            reason: e.to_string(),
        };

        let stream = self.connector.connect().map_err(connect_error)?;
        self.outbox
            .attach(stream.try_clone_writer().map_err(connect_error)?);
        info!("connected to {addr}");

        self.outbox
            .send(&Command::Nick(self.username.clone()))
            .map_err(connect_error)?;
        self.outbox
            .send(&Command::User {
                username: self.username.clone(),
                realname: self.realname.clone(),
            })
            .map_err(connect_error)?;
        Ok(stream)
    }

    fn listen(&mut self, stream: &mut C::Stream) -> Disconnect {
        let mut lines = LineBuffer::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = match stream.read(&mut chunk) {
                Ok(0) => return Disconnect::Eof,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Disconnect::Io(e),
            };
            lines.push(&chunk[..n]);

            while let Some(line) = lines.next_line() {
                info!(target: "javlabot::wire", "SERVER: {}", String::from_utf8_lossy(&line));
                for action in self.dispatcher.dispatch(&line) {
                    match action {
                        Action::Send(command) => {
                            if let Err(e) = self.outbox.send(&command) {
                                return Disconnect::Io(e);
                            }
                        }
                        Action::Reconnect => return Disconnect::ClosingLink,
                    }
                }
            }
        }
    }
}
